//! Inference request record.
//!
//! A fixed, enumerated set of known house attributes, every one individually
//! optional with a static declared type. Deserialization accepts both the
//! canonical column names and the numeral-safe aliases (`FirstFlrSF` for
//! `1stFlrSF` and so on). Absent fields resolve to the fitted imputation
//! defaults inside the pipeline, not here.

use crate::frame::{Frame, Value};
use serde::{Deserialize, Serialize};

/// One house, all fields optional.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HouseRecord {
    #[serde(rename = "MSSubClass", skip_serializing_if = "Option::is_none")]
    pub ms_sub_class: Option<f64>,
    #[serde(rename = "MSZoning", skip_serializing_if = "Option::is_none")]
    pub ms_zoning: Option<String>,
    #[serde(rename = "LotFrontage", skip_serializing_if = "Option::is_none")]
    pub lot_frontage: Option<f64>,
    #[serde(rename = "LotArea", skip_serializing_if = "Option::is_none")]
    pub lot_area: Option<f64>,
    #[serde(rename = "Street", skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(rename = "Alley", skip_serializing_if = "Option::is_none")]
    pub alley: Option<String>,
    #[serde(rename = "LotShape", skip_serializing_if = "Option::is_none")]
    pub lot_shape: Option<String>,
    #[serde(rename = "LandContour", skip_serializing_if = "Option::is_none")]
    pub land_contour: Option<String>,
    #[serde(rename = "Utilities", skip_serializing_if = "Option::is_none")]
    pub utilities: Option<String>,
    #[serde(rename = "LotConfig", skip_serializing_if = "Option::is_none")]
    pub lot_config: Option<String>,
    #[serde(rename = "LandSlope", skip_serializing_if = "Option::is_none")]
    pub land_slope: Option<String>,
    #[serde(rename = "Neighborhood", skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(rename = "Condition1", skip_serializing_if = "Option::is_none")]
    pub condition1: Option<String>,
    #[serde(rename = "Condition2", skip_serializing_if = "Option::is_none")]
    pub condition2: Option<String>,
    #[serde(rename = "BldgType", skip_serializing_if = "Option::is_none")]
    pub bldg_type: Option<String>,
    #[serde(rename = "HouseStyle", skip_serializing_if = "Option::is_none")]
    pub house_style: Option<String>,
    #[serde(rename = "OverallQual", skip_serializing_if = "Option::is_none")]
    pub overall_qual: Option<f64>,
    #[serde(rename = "OverallCond", skip_serializing_if = "Option::is_none")]
    pub overall_cond: Option<f64>,
    #[serde(rename = "YearBuilt", skip_serializing_if = "Option::is_none")]
    pub year_built: Option<f64>,
    #[serde(rename = "YearRemodAdd", skip_serializing_if = "Option::is_none")]
    pub year_remod_add: Option<f64>,
    #[serde(rename = "RoofStyle", skip_serializing_if = "Option::is_none")]
    pub roof_style: Option<String>,
    #[serde(rename = "RoofMatl", skip_serializing_if = "Option::is_none")]
    pub roof_matl: Option<String>,
    #[serde(rename = "Exterior1st", skip_serializing_if = "Option::is_none")]
    pub exterior1st: Option<String>,
    #[serde(rename = "Exterior2nd", skip_serializing_if = "Option::is_none")]
    pub exterior2nd: Option<String>,
    #[serde(rename = "MasVnrType", skip_serializing_if = "Option::is_none")]
    pub mas_vnr_type: Option<String>,
    #[serde(rename = "MasVnrArea", skip_serializing_if = "Option::is_none")]
    pub mas_vnr_area: Option<f64>,
    #[serde(rename = "ExterQual", skip_serializing_if = "Option::is_none")]
    pub exter_qual: Option<String>,
    #[serde(rename = "ExterCond", skip_serializing_if = "Option::is_none")]
    pub exter_cond: Option<String>,
    #[serde(rename = "Foundation", skip_serializing_if = "Option::is_none")]
    pub foundation: Option<String>,
    #[serde(rename = "BsmtQual", skip_serializing_if = "Option::is_none")]
    pub bsmt_qual: Option<String>,
    #[serde(rename = "BsmtCond", skip_serializing_if = "Option::is_none")]
    pub bsmt_cond: Option<String>,
    #[serde(rename = "BsmtExposure", skip_serializing_if = "Option::is_none")]
    pub bsmt_exposure: Option<String>,
    #[serde(rename = "BsmtFinType1", skip_serializing_if = "Option::is_none")]
    pub bsmt_fin_type1: Option<String>,
    #[serde(rename = "BsmtFinSF1", skip_serializing_if = "Option::is_none")]
    pub bsmt_fin_sf1: Option<f64>,
    #[serde(rename = "BsmtFinType2", skip_serializing_if = "Option::is_none")]
    pub bsmt_fin_type2: Option<String>,
    #[serde(rename = "BsmtFinSF2", skip_serializing_if = "Option::is_none")]
    pub bsmt_fin_sf2: Option<f64>,
    #[serde(rename = "BsmtUnfSF", skip_serializing_if = "Option::is_none")]
    pub bsmt_unf_sf: Option<f64>,
    #[serde(rename = "TotalBsmtSF", skip_serializing_if = "Option::is_none")]
    pub total_bsmt_sf: Option<f64>,
    #[serde(rename = "Heating", skip_serializing_if = "Option::is_none")]
    pub heating: Option<String>,
    #[serde(rename = "HeatingQC", skip_serializing_if = "Option::is_none")]
    pub heating_qc: Option<String>,
    #[serde(rename = "CentralAir", skip_serializing_if = "Option::is_none")]
    pub central_air: Option<String>,
    #[serde(rename = "Electrical", skip_serializing_if = "Option::is_none")]
    pub electrical: Option<String>,
    #[serde(rename = "1stFlrSF", alias = "FirstFlrSF", skip_serializing_if = "Option::is_none")]
    pub first_flr_sf: Option<f64>,
    #[serde(rename = "2ndFlrSF", alias = "SecondFlrSF", skip_serializing_if = "Option::is_none")]
    pub second_flr_sf: Option<f64>,
    #[serde(rename = "LowQualFinSF", skip_serializing_if = "Option::is_none")]
    pub low_qual_fin_sf: Option<f64>,
    #[serde(rename = "GrLivArea", skip_serializing_if = "Option::is_none")]
    pub gr_liv_area: Option<f64>,
    #[serde(rename = "BsmtFullBath", skip_serializing_if = "Option::is_none")]
    pub bsmt_full_bath: Option<f64>,
    #[serde(rename = "BsmtHalfBath", skip_serializing_if = "Option::is_none")]
    pub bsmt_half_bath: Option<f64>,
    #[serde(rename = "FullBath", skip_serializing_if = "Option::is_none")]
    pub full_bath: Option<f64>,
    #[serde(rename = "HalfBath", skip_serializing_if = "Option::is_none")]
    pub half_bath: Option<f64>,
    #[serde(rename = "BedroomAbvGr", skip_serializing_if = "Option::is_none")]
    pub bedroom_abv_gr: Option<f64>,
    #[serde(rename = "KitchenAbvGr", skip_serializing_if = "Option::is_none")]
    pub kitchen_abv_gr: Option<f64>,
    #[serde(rename = "KitchenQual", skip_serializing_if = "Option::is_none")]
    pub kitchen_qual: Option<String>,
    #[serde(rename = "TotRmsAbvGrd", skip_serializing_if = "Option::is_none")]
    pub tot_rms_abv_grd: Option<f64>,
    #[serde(rename = "Functional", skip_serializing_if = "Option::is_none")]
    pub functional: Option<String>,
    #[serde(rename = "Fireplaces", skip_serializing_if = "Option::is_none")]
    pub fireplaces: Option<f64>,
    #[serde(rename = "FireplaceQu", skip_serializing_if = "Option::is_none")]
    pub fireplace_qu: Option<String>,
    #[serde(rename = "GarageType", skip_serializing_if = "Option::is_none")]
    pub garage_type: Option<String>,
    #[serde(rename = "GarageYrBlt", skip_serializing_if = "Option::is_none")]
    pub garage_yr_blt: Option<f64>,
    #[serde(rename = "GarageFinish", skip_serializing_if = "Option::is_none")]
    pub garage_finish: Option<String>,
    #[serde(rename = "GarageCars", skip_serializing_if = "Option::is_none")]
    pub garage_cars: Option<f64>,
    #[serde(rename = "GarageArea", skip_serializing_if = "Option::is_none")]
    pub garage_area: Option<f64>,
    #[serde(rename = "GarageQual", skip_serializing_if = "Option::is_none")]
    pub garage_qual: Option<String>,
    #[serde(rename = "GarageCond", skip_serializing_if = "Option::is_none")]
    pub garage_cond: Option<String>,
    #[serde(rename = "PavedDrive", skip_serializing_if = "Option::is_none")]
    pub paved_drive: Option<String>,
    #[serde(rename = "WoodDeckSF", skip_serializing_if = "Option::is_none")]
    pub wood_deck_sf: Option<f64>,
    #[serde(rename = "OpenPorchSF", skip_serializing_if = "Option::is_none")]
    pub open_porch_sf: Option<f64>,
    #[serde(rename = "EnclosedPorch", skip_serializing_if = "Option::is_none")]
    pub enclosed_porch: Option<f64>,
    #[serde(rename = "3SsnPorch", alias = "ThreeSsnPorch", skip_serializing_if = "Option::is_none")]
    pub three_ssn_porch: Option<f64>,
    #[serde(rename = "ScreenPorch", skip_serializing_if = "Option::is_none")]
    pub screen_porch: Option<f64>,
    #[serde(rename = "PoolArea", skip_serializing_if = "Option::is_none")]
    pub pool_area: Option<f64>,
    #[serde(rename = "PoolQC", skip_serializing_if = "Option::is_none")]
    pub pool_qc: Option<String>,
    #[serde(rename = "Fence", skip_serializing_if = "Option::is_none")]
    pub fence: Option<String>,
    #[serde(rename = "MiscFeature", skip_serializing_if = "Option::is_none")]
    pub misc_feature: Option<String>,
    #[serde(rename = "MiscVal", skip_serializing_if = "Option::is_none")]
    pub misc_val: Option<f64>,
    #[serde(rename = "MoSold", skip_serializing_if = "Option::is_none")]
    pub mo_sold: Option<f64>,
    #[serde(rename = "YrSold", skip_serializing_if = "Option::is_none")]
    pub yr_sold: Option<f64>,
    #[serde(rename = "SaleType", skip_serializing_if = "Option::is_none")]
    pub sale_type: Option<String>,
    #[serde(rename = "SaleCondition", skip_serializing_if = "Option::is_none")]
    pub sale_condition: Option<String>,
}

impl HouseRecord {
    /// All fields as `(canonical column name, cell)` pairs, absent fields as
    /// missing cells.
    pub fn cells(&self) -> Vec<(&'static str, Value)> {
        fn num(v: &Option<f64>) -> Value {
            v.map(Value::from).unwrap_or(Value::Missing)
        }
        fn cat(v: &Option<String>) -> Value {
            v.as_deref().map(Value::from).unwrap_or(Value::Missing)
        }
        vec![
            ("MSSubClass", num(&self.ms_sub_class)),
            ("MSZoning", cat(&self.ms_zoning)),
            ("LotFrontage", num(&self.lot_frontage)),
            ("LotArea", num(&self.lot_area)),
            ("Street", cat(&self.street)),
            ("Alley", cat(&self.alley)),
            ("LotShape", cat(&self.lot_shape)),
            ("LandContour", cat(&self.land_contour)),
            ("Utilities", cat(&self.utilities)),
            ("LotConfig", cat(&self.lot_config)),
            ("LandSlope", cat(&self.land_slope)),
            ("Neighborhood", cat(&self.neighborhood)),
            ("Condition1", cat(&self.condition1)),
            ("Condition2", cat(&self.condition2)),
            ("BldgType", cat(&self.bldg_type)),
            ("HouseStyle", cat(&self.house_style)),
            ("OverallQual", num(&self.overall_qual)),
            ("OverallCond", num(&self.overall_cond)),
            ("YearBuilt", num(&self.year_built)),
            ("YearRemodAdd", num(&self.year_remod_add)),
            ("RoofStyle", cat(&self.roof_style)),
            ("RoofMatl", cat(&self.roof_matl)),
            ("Exterior1st", cat(&self.exterior1st)),
            ("Exterior2nd", cat(&self.exterior2nd)),
            ("MasVnrType", cat(&self.mas_vnr_type)),
            ("MasVnrArea", num(&self.mas_vnr_area)),
            ("ExterQual", cat(&self.exter_qual)),
            ("ExterCond", cat(&self.exter_cond)),
            ("Foundation", cat(&self.foundation)),
            ("BsmtQual", cat(&self.bsmt_qual)),
            ("BsmtCond", cat(&self.bsmt_cond)),
            ("BsmtExposure", cat(&self.bsmt_exposure)),
            ("BsmtFinType1", cat(&self.bsmt_fin_type1)),
            ("BsmtFinSF1", num(&self.bsmt_fin_sf1)),
            ("BsmtFinType2", cat(&self.bsmt_fin_type2)),
            ("BsmtFinSF2", num(&self.bsmt_fin_sf2)),
            ("BsmtUnfSF", num(&self.bsmt_unf_sf)),
            ("TotalBsmtSF", num(&self.total_bsmt_sf)),
            ("Heating", cat(&self.heating)),
            ("HeatingQC", cat(&self.heating_qc)),
            ("CentralAir", cat(&self.central_air)),
            ("Electrical", cat(&self.electrical)),
            ("1stFlrSF", num(&self.first_flr_sf)),
            ("2ndFlrSF", num(&self.second_flr_sf)),
            ("LowQualFinSF", num(&self.low_qual_fin_sf)),
            ("GrLivArea", num(&self.gr_liv_area)),
            ("BsmtFullBath", num(&self.bsmt_full_bath)),
            ("BsmtHalfBath", num(&self.bsmt_half_bath)),
            ("FullBath", num(&self.full_bath)),
            ("HalfBath", num(&self.half_bath)),
            ("BedroomAbvGr", num(&self.bedroom_abv_gr)),
            ("KitchenAbvGr", num(&self.kitchen_abv_gr)),
            ("KitchenQual", cat(&self.kitchen_qual)),
            ("TotRmsAbvGrd", num(&self.tot_rms_abv_grd)),
            ("Functional", cat(&self.functional)),
            ("Fireplaces", num(&self.fireplaces)),
            ("FireplaceQu", cat(&self.fireplace_qu)),
            ("GarageType", cat(&self.garage_type)),
            ("GarageYrBlt", num(&self.garage_yr_blt)),
            ("GarageFinish", cat(&self.garage_finish)),
            ("GarageCars", num(&self.garage_cars)),
            ("GarageArea", num(&self.garage_area)),
            ("GarageQual", cat(&self.garage_qual)),
            ("GarageCond", cat(&self.garage_cond)),
            ("PavedDrive", cat(&self.paved_drive)),
            ("WoodDeckSF", num(&self.wood_deck_sf)),
            ("OpenPorchSF", num(&self.open_porch_sf)),
            ("EnclosedPorch", num(&self.enclosed_porch)),
            ("3SsnPorch", num(&self.three_ssn_porch)),
            ("ScreenPorch", num(&self.screen_porch)),
            ("PoolArea", num(&self.pool_area)),
            ("PoolQC", cat(&self.pool_qc)),
            ("Fence", cat(&self.fence)),
            ("MiscFeature", cat(&self.misc_feature)),
            ("MiscVal", num(&self.misc_val)),
            ("MoSold", num(&self.mo_sold)),
            ("YrSold", num(&self.yr_sold)),
            ("SaleType", cat(&self.sale_type)),
            ("SaleCondition", cat(&self.sale_condition)),
        ]
    }

    /// Single-row frame over the full field set.
    pub fn to_frame(&self) -> Frame {
        let mut frame = Frame::new();
        for (name, cell) in self.cells() {
            // Field names are unique; adding cannot fail.
            let _ = frame.add_column(name.to_string(), vec![cell]);
        }
        frame
    }
}
