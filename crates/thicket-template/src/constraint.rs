//! Template constraint validation
//!
//! One routine checks a value against a property slot, whether the value
//! is a placeholder (checked through its declared definition) or an
//! existing thing (checked through the definition derived from it). A
//! slot's rule never depends on whether its filler already exists.

use crate::error::ConstraintError;
use crate::model::{PropertyConstraint, Slot, Template, TemplateProperty};
use regex::Regex;
use thicket_graph::{classes, ClassRepository, ThingId, Xsd};
use thicket_symbol::{LiteralDefinition, Resolution, ThingDefinition, ThingDefinitions};

/// Checks supplied values against template slots
#[derive(Clone, Copy)]
pub struct TemplateConstraintValidator<'a> {
    classes: &'a dyn ClassRepository,
}

impl<'a> TemplateConstraintValidator<'a> {
    /// Create validator; the class lookup answers subclass questions
    #[inline]
    #[must_use]
    pub fn new(classes: &'a dyn ClassRepository) -> Self {
        Self { classes }
    }

    /// Check the number of input positions of a multi-argument statement
    ///
    /// The subject position is implicit, so `object_positions + 1` inputs
    /// are compared against the number of template properties.
    ///
    /// # Returns
    /// - `Err(ConstraintError::MissingInputPositions)` for too few positions
    /// - `Err(ConstraintError::TooManyInputPositions)` for too many
    pub fn check_arity(
        &self,
        template: &Template,
        object_positions: usize,
    ) -> Result<(), ConstraintError> {
        let expected = template.properties.len();
        let actual = object_positions + 1;
        let diff = actual as isize - expected as isize;

        match diff {
            0 => Ok(()),
            d if d < 0 => Err(ConstraintError::MissingInputPositions {
                template: template.id.clone(),
                expected,
                diff,
            }),
            _ => Err(ConstraintError::TooManyInputPositions {
                template: template.id.clone(),
                expected,
                diff,
            }),
        }
    }

    /// Check the number of values supplied for a slot
    ///
    /// Bounds that are absent or zero are not enforced.
    pub fn validate_cardinality(
        &self,
        property: &TemplateProperty,
        slot: Slot,
        count: usize,
    ) -> Result<(), ConstraintError> {
        if let Some(min) = property.min_count.filter(|min| *min > 0) {
            if count < min as usize {
                return Err(ConstraintError::MissingPropertyValues {
                    slot,
                    min,
                    actual: count,
                });
            }
        }
        if let Some(max) = property.max_count.filter(|max| *max > 0) {
            if count > max as usize {
                return Err(ConstraintError::TooManyPropertyValues {
                    slot,
                    max,
                    actual: count,
                });
            }
        }
        Ok(())
    }

    /// Check a resolved value against a slot
    ///
    /// Placeholders are checked through their definition in `definitions`,
    /// existing things through [`ThingDefinition::from_thing`].
    pub fn validate_value(
        &self,
        property: &TemplateProperty,
        object_id: &str,
        resolution: &Resolution,
        definitions: &ThingDefinitions,
    ) -> Result<(), ConstraintError> {
        let definition = match resolution {
            Resolution::Placeholder(id) => definitions
                .find(id)
                .ok_or_else(|| ConstraintError::MissingDefinition(id.clone()))?,
            Resolution::Existing(thing) => ThingDefinition::from_thing(thing),
        };
        self.validate_object(property, object_id, &definition)
    }

    /// Check a value description against a slot
    pub fn validate_object(
        &self,
        property: &TemplateProperty,
        object_id: &str,
        object: &ThingDefinition,
    ) -> Result<(), ConstraintError> {
        match &property.constraint {
            PropertyConstraint::Untyped => Ok(()),
            PropertyConstraint::Resource { class } => {
                self.validate_resource(property, object_id, object, class)
            }
            PropertyConstraint::StringLiteral { pattern } => {
                let literal = require_literal(property, object_id, object)?;
                check_datatype(property, object_id, literal, Xsd::String.prefixed_uri())?;
                match pattern {
                    Some(pattern) => check_pattern(property, object_id, literal, pattern),
                    None => Ok(()),
                }
            }
            PropertyConstraint::NumberLiteral {
                datatype,
                min_inclusive,
                max_inclusive,
            } => {
                let literal = require_literal(property, object_id, object)?;
                check_datatype(property, object_id, literal, datatype.prefixed_uri())?;
                check_bounds(property, object_id, literal, *min_inclusive, *max_inclusive)
            }
            PropertyConstraint::OtherLiteral { datatype } => {
                let literal = require_literal(property, object_id, object)?;
                check_datatype(property, object_id, literal, datatype)
            }
        }
    }

    fn validate_resource(
        &self,
        property: &TemplateProperty,
        object_id: &str,
        object: &ThingDefinition,
        target: &ThingId,
    ) -> Result<(), ConstraintError> {
        let object_name = || object_id.to_string();

        if let ThingDefinition::Literal(_) = object {
            return Err(ConstraintError::ObjectMustNotBeALiteral {
                property: property.id.clone(),
                object: object_name(),
            });
        }

        if *target == classes::CLASSES {
            return match object {
                ThingDefinition::Class(_) => Ok(()),
                _ => Err(ConstraintError::ObjectIsNotAClass {
                    property: property.id.clone(),
                    object: object_name(),
                }),
            };
        }
        if *target == classes::PREDICATES {
            return match object {
                ThingDefinition::Predicate(_) => Ok(()),
                _ => Err(ConstraintError::ObjectIsNotAPredicate {
                    property: property.id.clone(),
                    object: object_name(),
                }),
            };
        }
        if *target == classes::LIST {
            return match object {
                ThingDefinition::List(_) => Ok(()),
                _ => Err(ConstraintError::ObjectIsNotAList {
                    property: property.id.clone(),
                    object: object_name(),
                }),
            };
        }
        if *target == classes::RESOURCES {
            return Ok(());
        }

        for class in object.class_ids() {
            if class == *target || self.classes.is_subclass_of(&class, target)? {
                return Ok(());
            }
        }
        Err(ConstraintError::ResourceIsNotAnInstanceOfTargetClass {
            property: property.id.clone(),
            object: object_name(),
            target_class: target.clone(),
        })
    }
}

impl std::fmt::Debug for TemplateConstraintValidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateConstraintValidator").finish_non_exhaustive()
    }
}

fn require_literal<'d>(
    property: &TemplateProperty,
    object_id: &str,
    object: &'d ThingDefinition,
) -> Result<&'d LiteralDefinition, ConstraintError> {
    match object {
        ThingDefinition::Literal(literal) => Ok(literal),
        _ => Err(ConstraintError::ObjectIsNotALiteral {
            property: property.id.clone(),
            object: object_id.to_string(),
        }),
    }
}

fn check_datatype(
    property: &TemplateProperty,
    object_id: &str,
    literal: &LiteralDefinition,
    datatype: &str,
) -> Result<(), ConstraintError> {
    match Xsd::from_prefixed_uri(datatype) {
        Some(xsd) if !xsd.can_parse(&literal.label) => Err(ConstraintError::InvalidLiteral {
            property: property.id.clone(),
            object: object_id.to_string(),
            datatype: datatype.to_string(),
            label: literal.label.clone(),
        }),
        Some(_) => Ok(()),
        None if literal.datatype != datatype => Err(ConstraintError::MismatchedDataType {
            property: property.id.clone(),
            object: object_id.to_string(),
            expected: datatype.to_string(),
            found: literal.datatype.clone(),
        }),
        None => Ok(()),
    }
}

fn check_pattern(
    property: &TemplateProperty,
    object_id: &str,
    literal: &LiteralDefinition,
    pattern: &str,
) -> Result<(), ConstraintError> {
    let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|_| {
        ConstraintError::InvalidPattern {
            property: property.id.clone(),
            pattern: pattern.to_string(),
        }
    })?;
    if regex.is_match(&literal.label) {
        Ok(())
    } else {
        Err(ConstraintError::LabelDoesNotMatchPattern {
            property: property.id.clone(),
            object: object_id.to_string(),
            label: literal.label.clone(),
            pattern: pattern.to_string(),
        })
    }
}

fn check_bounds(
    property: &TemplateProperty,
    object_id: &str,
    literal: &LiteralDefinition,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), ConstraintError> {
    // value space was checked before, so only NaN-like labels fail to parse
    let Ok(value) = literal.label.parse::<f64>() else {
        return Ok(());
    };
    if let Some(min) = min {
        if value < min {
            return Err(ConstraintError::NumberTooLow {
                property: property.id.clone(),
                object: object_id.to_string(),
                label: literal.label.clone(),
                min,
            });
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(ConstraintError::NumberTooHigh {
                property: property.id.clone(),
                object: object_id.to_string(),
                label: literal.label.clone(),
                max,
            });
        }
    }
    Ok(())
}
