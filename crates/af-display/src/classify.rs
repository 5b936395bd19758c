//! Display groups for declared column types.

use af_types::DType;

use crate::text::plural;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeGroup {
    Numeric,
    String,
    Boolean,
    Temporal,
    Dictionary,
    Other,
}

impl TypeGroup {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Temporal => "temporal",
            Self::Dictionary => "dictionary",
            Self::Other => "other",
        }
    }

    /// Groups whose previews may collapse into a tally and carry
    /// NaN / nil annotations.
    #[must_use]
    pub fn is_tallied(self) -> bool {
        matches!(self, Self::Numeric | Self::String | Self::Boolean)
    }
}

#[must_use]
pub fn classify(dtype: DType) -> TypeGroup {
    match dtype {
        d if d.is_numeric() => TypeGroup::Numeric,
        DType::Utf8 => TypeGroup::String,
        DType::Boolean => TypeGroup::Boolean,
        d if d.is_temporal() => TypeGroup::Temporal,
        DType::Dictionary => TypeGroup::Dictionary,
        _ => TypeGroup::Other,
    }
}

const LISTED_GROUPS: [TypeGroup; 4] = [
    TypeGroup::Numeric,
    TypeGroup::String,
    TypeGroup::Boolean,
    TypeGroup::Temporal,
];

/// `Vectors : 2 numeric, 1 string, 1 boolean`
#[must_use]
pub fn group_line(dtypes: &[DType]) -> String {
    let groups: Vec<TypeGroup> = dtypes.iter().copied().map(classify).collect();
    let parts: Vec<String> = LISTED_GROUPS
        .iter()
        .filter_map(|group| {
            let n = groups.iter().filter(|g| *g == group).count();
            (n > 0).then(|| format!("{n} {}", group.name()))
        })
        .collect();
    format!("{} : {}", plural("Vector", dtypes.len()), parts.join(", "))
        .trim_end()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use af_types::DType;

    use super::{TypeGroup, classify, group_line};

    #[test]
    fn integer_and_float_types_share_numeric_group() {
        for dtype in [DType::UInt8, DType::Int64, DType::Float, DType::Double] {
            assert_eq!(classify(dtype), TypeGroup::Numeric);
        }
        assert_eq!(classify(DType::Timestamp), TypeGroup::Temporal);
        assert_eq!(classify(DType::Null), TypeGroup::Other);
    }

    #[test]
    fn group_line_uses_fixed_order_and_pluralizes() {
        let dtypes = [DType::Boolean, DType::UInt8, DType::Utf8, DType::Double];
        assert_eq!(
            group_line(&dtypes),
            "Vectors : 2 numeric, 1 string, 1 boolean"
        );
        assert_eq!(group_line(&[DType::UInt8]), "Vector : 1 numeric");
    }

    #[test]
    fn dictionary_columns_are_not_listed() {
        let mut dtypes = vec![DType::Dictionary];
        dtypes.extend([DType::Double; 8]);
        assert_eq!(group_line(&dtypes), "Vectors : 8 numeric");
    }
}
