//! Engineered real-estate features derived from raw columns.
//!
//! Derivations run in a fixed order because later features depend on earlier
//! ones (`Ln_TotalSF` and the quality interactions read `TotalSF`). The only
//! fitted state is the winsor cap for `LotArea_clip`, learned as the 0.99
//! training quantile; everything else is a pure per-record computation.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use crate::preprocessing::traits::{FittedTransform, Transform};
use crate::stats::quantile_sorted;
use serde::{Deserialize, Serialize};

/// Upper quantile used for the lot-area winsor cap.
const LOT_AREA_CAP_QUANTILE: f64 = 0.99;

/// Domain feature builder (unfitted).
#[derive(Clone, Debug, Default)]
pub struct DomainFeatures;

impl DomainFeatures {
    pub fn new() -> Self {
        Self
    }
}

/// Fitted domain feature builder.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedDomainFeatures {
    /// 0.99 training quantile of `LotArea`; `None` when the column was
    /// absent or empty at fit time.
    lot_area_cap_: Option<f64>,
}

impl FittedDomainFeatures {
    /// The winsor cap applied to `LotArea_clip`.
    pub fn lot_area_cap(&self) -> Option<f64> {
        self.lot_area_cap_
    }
}

impl Transform for DomainFeatures {
    type Fitted = FittedDomainFeatures;

    fn fit(&self, frame: &Frame, _target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError> {
        let lot_area_cap_ = frame.column("LotArea").and_then(|cells| {
            let mut nums: Vec<f64> = cells.iter().filter_map(|c| c.as_num()).collect();
            if nums.is_empty() {
                return None;
            }
            nums.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            Some(quantile_sorted(&nums, LOT_AREA_CAP_QUANTILE))
        });
        Ok(FittedDomainFeatures { lot_area_cap_ })
    }
}

impl FittedTransform for FittedDomainFeatures {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let n = frame.n_rows();
        let mut out = frame.clone();

        let num = |name: &str, row: usize| -> Option<f64> {
            frame.get(name, row).and_then(|v| v.as_num())
        };
        // Absent columns and missing cells read as 0 for area/bath totals.
        let num0 = |name: &str, row: usize| num(name, row).unwrap_or(0.0);

        // Total square footage; later features depend on it.
        let total_sf: Vec<f64> = (0..n)
            .map(|r| num0("TotalBsmtSF", r) + num0("1stFlrSF", r) + num0("2ndFlrSF", r))
            .collect();
        out.set_column(
            "TotalSF",
            total_sf.iter().map(|&v| Value::Num(v)).collect(),
        )?;

        // Weighted bathroom count.
        let total_bath: Vec<f64> = (0..n)
            .map(|r| {
                num0("FullBath", r)
                    + 0.5 * num0("HalfBath", r)
                    + num0("BsmtFullBath", r)
                    + 0.5 * num0("BsmtHalfBath", r)
            })
            .collect();
        out.set_column(
            "TotalBath",
            total_bath.iter().map(|&v| Value::Num(v)).collect(),
        )?;

        // Age features, clipped at zero; missing years stay missing and are
        // resolved by imputation.
        let age = |built_col: &str, row: usize| -> Value {
            match (num("YrSold", row), num(built_col, row)) {
                (Some(sold), Some(built)) => Value::Num((sold - built).max(0.0)),
                _ => Value::Missing,
            }
        };
        out.set_column("HouseAge", (0..n).map(|r| age("YearBuilt", r)).collect())?;
        out.set_column("RemodAge", (0..n).map(|r| age("YearRemodAdd", r)).collect())?;
        out.set_column("GarageAge", (0..n).map(|r| age("GarageYrBlt", r)).collect())?;

        out.set_column(
            "IsRemodeled",
            (0..n)
                .map(|r| {
                    let flag = match (num("YearRemodAdd", r), num("YearBuilt", r)) {
                        (Some(remod), Some(built)) => remod != built,
                        _ => false,
                    };
                    Value::Num(if flag { 1.0 } else { 0.0 })
                })
                .collect(),
        )?;
        out.set_column(
            "Has2ndFlr",
            (0..n)
                .map(|r| Value::Num(if num0("2ndFlrSF", r) > 0.0 { 1.0 } else { 0.0 }))
                .collect(),
        )?;

        out.set_column(
            "TotalPorchSF",
            (0..n)
                .map(|r| {
                    Value::Num(
                        num0("OpenPorchSF", r)
                            + num0("EnclosedPorch", r)
                            + num0("3SsnPorch", r)
                            + num0("ScreenPorch", r)
                            + num0("WoodDeckSF", r),
                    )
                })
                .collect(),
        )?;

        // Ratio features with the denominator floored at 1.
        out.set_column(
            "BathPerBedroom",
            (0..n)
                .map(|r| Value::Num(total_bath[r] / num0("BedroomAbvGr", r).max(1.0)))
                .collect(),
        )?;
        out.set_column(
            "RoomsPerArea",
            (0..n)
                .map(|r| Value::Num(num0("TotRmsAbvGrd", r) / num0("GrLivArea", r).max(1.0)))
                .collect(),
        )?;
        out.set_column(
            "LotAreaRatio",
            (0..n)
                .map(|r| Value::Num(num0("LotArea", r) / num0("GrLivArea", r).max(1.0)))
                .collect(),
        )?;

        // Cyclical month-of-sale encoding.
        if frame.has_column("MoSold") {
            let angle = |r: usize| {
                num("MoSold", r).map(|m| 2.0 * std::f64::consts::PI * (m / 12.0))
            };
            out.set_column(
                "MoSold_sin",
                (0..n)
                    .map(|r| angle(r).map(|a| Value::Num(a.sin())).unwrap_or(Value::Missing))
                    .collect(),
            )?;
            out.set_column(
                "MoSold_cos",
                (0..n)
                    .map(|r| angle(r).map(|a| Value::Num(a.cos())).unwrap_or(Value::Missing))
                    .collect(),
            )?;
        }

        // Location/dwelling interaction for the target encoder.
        if frame.has_column("Neighborhood") && frame.has_column("BldgType") {
            out.set_column(
                "Neighborhood_BldgType",
                (0..n)
                    .map(|r| {
                        let nbhd = frame.get("Neighborhood", r).and_then(|v| v.as_cat());
                        let bldg = frame.get("BldgType", r).and_then(|v| v.as_cat());
                        match (nbhd, bldg) {
                            (Some(nb), Some(bt)) => Value::Cat(format!("{}|{}", nb, bt)),
                            _ => Value::Missing,
                        }
                    })
                    .collect(),
            )?;
        }

        out.set_column(
            "Ln_TotalSF",
            total_sf.iter().map(|&v| Value::Num(v.ln_1p())).collect(),
        )?;

        // Quality-area interactions.
        if frame.has_column("OverallQual") {
            let interaction = |other: &dyn Fn(usize) -> Option<f64>, r: usize| -> Value {
                match (num("OverallQual", r), other(r)) {
                    (Some(q), Some(v)) => Value::Num(q * v),
                    _ => Value::Missing,
                }
            };
            out.set_column(
                "IQ_OQ_GrLiv",
                (0..n)
                    .map(|r| interaction(&|r| num("GrLivArea", r), r))
                    .collect(),
            )?;
            out.set_column(
                "IQ_OQ_TotalSF",
                (0..n)
                    .map(|r| interaction(&|r| Some(total_sf[r]), r))
                    .collect(),
            )?;
        }

        // Winsorized lot area using the fit-time cap.
        if frame.has_column("LotArea") {
            out.set_column(
                "LotArea_clip",
                (0..n)
                    .map(|r| match num("LotArea", r) {
                        Some(v) => Value::Num(match self.lot_area_cap_ {
                            Some(cap) => v.min(cap),
                            None => v,
                        }),
                        None => Value::Missing,
                    })
                    .collect(),
            )?;
        }

        Ok(out)
    }
}
