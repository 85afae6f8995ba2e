//! Object/variant identity of a run.

/// The object (family) and optional variant a run is configured for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectVariant {
    pub object: Option<String>,
    pub variant: Option<String>,
}

impl ObjectVariant {
    pub fn new(object: Option<&str>, variant: Option<&str>) -> Self {
        Self {
            object: non_blank(object),
            variant: non_blank(variant),
        }
    }

    /// Builds the identity, splitting `M140_BNKA` into object and variant
    /// when no explicit variant is given.
    pub fn parse(object: Option<&str>, variant: Option<&str>) -> Self {
        let parsed = Self::new(object, variant);
        match (&parsed.object, &parsed.variant) {
            (Some(object), None) => match object.split_once('_') {
                Some((left, right)) => Self::new(Some(left), Some(right)),
                None => parsed,
            },
            _ => parsed,
        }
    }

    /// `object_variant`, or whichever part is set.
    pub fn label(&self) -> String {
        match (&self.object, &self.variant) {
            (Some(object), Some(variant)) => format!("{object}_{variant}"),
            (Some(object), None) => object.clone(),
            (None, Some(variant)) => variant.clone(),
            (None, None) => String::new(),
        }
    }

    pub fn object_str(&self) -> &str {
        self.object.as_deref().unwrap_or_default()
    }

    pub fn variant_str(&self) -> &str {
        self.variant.as_deref().unwrap_or_default()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_underscore() {
        let target = ObjectVariant::parse(Some("M140_BNKA_X"), None);
        assert_eq!(target.object.as_deref(), Some("M140"));
        assert_eq!(target.variant.as_deref(), Some("BNKA_X"));
        assert_eq!(target.label(), "M140_BNKA_X");
    }

    #[test]
    fn explicit_variant_disables_split() {
        let target = ObjectVariant::parse(Some("M140_A"), Some("B"));
        assert_eq!(target.object.as_deref(), Some("M140_A"));
        assert_eq!(target.label(), "M140_A_B");
    }

    #[test]
    fn label_without_variant() {
        assert_eq!(ObjectVariant::parse(Some("M140"), None).label(), "M140");
        assert_eq!(ObjectVariant::default().label(), "");
    }
}
