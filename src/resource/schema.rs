//! Resource schema definitions
//!
//! Declares attributes, their kinds, defaults and validators. The plugin host
//! normally applies these during planning; the driver binary calls
//! [`ResourceSchema::apply_defaults`] and [`ResourceSchema::check`] itself.

use super::data::{AttrValue, ResourceData};
use crate::error::{ProviderError, Result};
use crate::validate::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    String,
    Int,
    Bool,
    List,
    Map,
}

impl AttrKind {
    fn matches(self, value: &AttrValue) -> bool {
        matches!(
            (self, value),
            (AttrKind::String, AttrValue::String(_))
                | (AttrKind::Int, AttrValue::Int(_))
                | (AttrKind::Bool, AttrValue::Bool(_))
                | (AttrKind::List, AttrValue::List(_))
                | (AttrKind::Map, AttrValue::Map(_))
        )
    }
}

/// One attribute of a resource
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub kind: AttrKind,
    pub required: bool,
    /// Changing the value replaces the remote object
    pub force_new: bool,
    pub default: Option<AttrValue>,
    pub min_items: usize,
    pub validator: Option<Validator>,
    /// Applied to each element of a list attribute
    pub elem_validator: Option<Validator>,
    pub description: &'static str,
}

impl AttributeSchema {
    fn new(name: &'static str, kind: AttrKind, required: bool) -> Self {
        Self {
            name,
            kind,
            required,
            force_new: false,
            default: None,
            min_items: 0,
            validator: None,
            elem_validator: None,
            description: "",
        }
    }

    pub fn required(name: &'static str, kind: AttrKind) -> Self {
        Self::new(name, kind, true)
    }

    pub fn optional(name: &'static str, kind: AttrKind) -> Self {
        Self::new(name, kind, false)
    }

    pub fn with_default(mut self, value: impl Into<AttrValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn min_items(mut self, count: usize) -> Self {
        self.min_items = count;
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn validate_elem(mut self, validator: Validator) -> Self {
        self.elem_validator = Some(validator);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn errors(&self, value: &AttrValue) -> Vec<String> {
        if !self.kind.matches(value) {
            return vec![format!("{:?} expected type {:?}", self.name, self.kind)];
        }

        let mut errors = Vec::new();
        if let Some(validator) = self.validator {
            errors.extend(validator.check(self.name, value).errors);
        }
        if let Some(items) = value.as_list() {
            if items.len() < self.min_items {
                errors.push(format!(
                    "{:?} requires at least {} item(s), got {}",
                    self.name,
                    self.min_items,
                    items.len()
                ));
            }
            if let Some(validator) = self.elem_validator {
                for item in items {
                    errors.extend(validator.check(self.name, item).errors);
                }
            }
        }
        errors
    }
}

/// Ordered attribute list of a resource type
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub attributes: Vec<AttributeSchema>,
}

impl ResourceSchema {
    pub fn new(attributes: Vec<AttributeSchema>) -> Self {
        Self { attributes }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Fill unset optional attributes with their defaults
    pub fn apply_defaults<D: ResourceData + ?Sized>(&self, d: &mut D) {
        for attribute in &self.attributes {
            if let Some(default) = &attribute.default {
                if d.get(attribute.name).is_none() {
                    d.set(attribute.name, default.clone());
                }
            }
        }
    }

    /// Every problem found in the bag, in schema order
    pub fn validate<D: ResourceData + ?Sized>(&self, d: &D) -> Vec<String> {
        let mut errors = Vec::new();
        for attribute in &self.attributes {
            match d.get(attribute.name) {
                Some(value) => errors.extend(attribute.errors(value)),
                None if attribute.required => {
                    errors.push(format!("{:?} is required", attribute.name));
                }
                None => {}
            }
        }
        errors
    }

    pub fn check<D: ResourceData + ?Sized>(&self, d: &D) -> Result<()> {
        let errors = self.validate(d);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::Schema(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::data::AttributeBag;
    use crate::validate::PROCESSING_GUARANTEES;

    fn schema() -> ResourceSchema {
        ResourceSchema::new(vec![
            AttributeSchema::required("name", AttrKind::String),
            AttributeSchema::optional("parallelism", AttrKind::Int)
                .with_default(1i64)
                .validate(Validator::GtEq0),
            AttributeSchema::optional("processing_guarantees", AttrKind::String)
                .with_default("EFFECTIVELY_ONCE")
                .validate(Validator::OneOf(PROCESSING_GUARANTEES)),
            AttributeSchema::required("inputs", AttrKind::List)
                .min_items(1)
                .validate_elem(Validator::NotBlank),
        ])
    }

    #[test]
    fn test_apply_defaults_keeps_user_values() {
        let mut bag = AttributeBag::new().with("parallelism", 4i64);
        schema().apply_defaults(&mut bag);
        assert_eq!(bag.get_int("parallelism"), 4);
        assert_eq!(bag.get_str("processing_guarantees"), "EFFECTIVELY_ONCE");
        assert!(bag.get("name").is_none());
    }

    #[test]
    fn test_validate_reports_everything() {
        let bag = AttributeBag::new()
            .with("parallelism", -2i64)
            .with("processing_guarantees", "exactly_once")
            .with("inputs", vec!["ok".to_string(), "  ".to_string()]);
        let errors = schema().validate(&bag);
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert_eq!(errors[0], "\"name\" is required");
        assert!(errors[1].contains("must be 0 or more"));
        assert!(errors[2].starts_with("must be one of"));
        assert_eq!(errors[3], "\"inputs\" must not be empty");
    }

    #[test]
    fn test_validate_min_items_and_kind() {
        let bag = AttributeBag::new()
            .with("name", 5i64)
            .with("inputs", Vec::<String>::new());
        let errors = schema().validate(&bag);
        assert_eq!(
            errors,
            vec![
                "\"name\" expected type String".to_string(),
                "\"inputs\" requires at least 1 item(s), got 0".to_string(),
            ]
        );
        assert!(matches!(schema().check(&bag), Err(ProviderError::Schema(_))));
    }
}
