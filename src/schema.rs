//! Fixed facts about the raw housing dataset: the target column, ordinal
//! vocabularies, field-name aliases and columns with special handling.

/// Name of the target column in the training data.
pub const TARGET: &str = "SalePrice";

/// Row identifier column, excluded from the feature space.
pub const ID_COLUMN: &str = "Id";

/// Columns that look numeric in the raw data but are categorical codes.
pub const CODED_CATEGORICAL: &[&str] = &["MSSubClass"];

/// Canonical ordered vocabularies for the ordinal columns.
///
/// Ranks run low to high in listed order; `NA` is the explicit
/// "feature absent" level where the data dictionary defines one.
pub const ORDINAL_VOCABULARY: &[(&str, &[&str])] = &[
    ("ExterQual", &["Po", "Fa", "TA", "Gd", "Ex"]),
    ("ExterCond", &["Po", "Fa", "TA", "Gd", "Ex"]),
    ("BsmtQual", &["NA", "Po", "Fa", "TA", "Gd", "Ex"]),
    ("BsmtCond", &["NA", "Po", "Fa", "TA", "Gd", "Ex"]),
    ("BsmtExposure", &["NA", "No", "Mn", "Av", "Gd"]),
    ("BsmtFinType1", &["NA", "Unf", "LwQ", "Rec", "BLQ", "ALQ", "GLQ"]),
    ("BsmtFinType2", &["NA", "Unf", "LwQ", "Rec", "BLQ", "ALQ", "GLQ"]),
    ("HeatingQC", &["Po", "Fa", "TA", "Gd", "Ex"]),
    ("KitchenQual", &["Po", "Fa", "TA", "Gd", "Ex"]),
    ("FireplaceQu", &["NA", "Po", "Fa", "TA", "Gd", "Ex"]),
    ("GarageFinish", &["NA", "Unf", "RFn", "Fin"]),
    ("GarageQual", &["NA", "Po", "Fa", "TA", "Gd", "Ex"]),
    ("GarageCond", &["NA", "Po", "Fa", "TA", "Gd", "Ex"]),
    ("PoolQC", &["NA", "Fa", "TA", "Gd", "Ex"]),
    ("Fence", &["NA", "MnWw", "GdWo", "MnPrv", "GdPrv"]),
    ("Functional", &["Sal", "Sev", "Maj2", "Maj1", "Mod", "Min2", "Min1", "Typ"]),
    ("PavedDrive", &["N", "P", "Y"]),
    ("Street", &["Grvl", "Pave"]),
    ("Alley", &["NA", "Grvl", "Pave"]),
    ("CentralAir", &["N", "Y"]),
];

/// Columns encoded with smoothed target statistics by default.
///
/// `Neighborhood_BldgType` is derived by the domain feature builder before
/// the encoder runs.
pub const DEFAULT_TARGET_ENCODED: &[&str] = &[
    "Neighborhood",
    "MSZoning",
    "Exterior1st",
    "Exterior2nd",
    "SaleCondition",
    "BldgType",
    "Neighborhood_BldgType",
];

/// Aliases for columns whose canonical names start with a numeral and so
/// cannot be struct field identifiers. Request fields accept either form;
/// the pipeline always sees the canonical name.
pub const FIELD_ALIASES: &[(&str, &str)] = &[
    ("FirstFlrSF", "1stFlrSF"),
    ("SecondFlrSF", "2ndFlrSF"),
    ("ThreeSsnPorch", "3SsnPorch"),
];

/// Ordered vocabulary for one ordinal column, if it has one.
pub fn ordinal_vocabulary(column: &str) -> Option<&'static [&'static str]> {
    ORDINAL_VOCABULARY
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, vocab)| *vocab)
}

/// Whether a column is one of the canonical ordinal columns.
pub fn is_ordinal(column: &str) -> bool {
    ordinal_vocabulary(column).is_some()
}

/// Canonical column name for a possibly aliased field name.
pub fn canonical_name(field: &str) -> &str {
    for (alias, canonical) in FIELD_ALIASES {
        if *alias == field {
            return canonical;
        }
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_vocabulary_lookup() {
        let vocab = ordinal_vocabulary("ExterQual").unwrap();
        assert_eq!(vocab, &["Po", "Fa", "TA", "Gd", "Ex"]);
        assert!(ordinal_vocabulary("Neighborhood").is_none());
    }

    #[test]
    fn test_is_ordinal() {
        assert!(is_ordinal("CentralAir"));
        assert!(!is_ordinal("GrLivArea"));
    }

    #[test]
    fn test_canonical_name_aliases() {
        assert_eq!(canonical_name("FirstFlrSF"), "1stFlrSF");
        assert_eq!(canonical_name("ThreeSsnPorch"), "3SsnPorch");
        assert_eq!(canonical_name("GrLivArea"), "GrLivArea");
    }

    #[test]
    fn test_vocabularies_are_unique() {
        for (col, vocab) in ORDINAL_VOCABULARY {
            let mut seen = std::collections::HashSet::new();
            for level in *vocab {
                assert!(seen.insert(level), "duplicate level in {}", col);
            }
        }
    }
}
