//! Validation of declared placeholders and thing definitions
//!
//! [`PlaceholderValidator`] runs before any resolution and fixes the
//! universe of declared placeholders. [`DefinitionValidator`] checks the
//! content of every definition and resolves the ids it references.

use crate::definition::ThingDefinitions;
use crate::error::SymbolError;
use crate::placeholder::{Placeholder, PlaceholderKind, PlaceholderSet};
use crate::resolution::{IdentifierResolver, Resolution, ResolutionCache};
use std::collections::BTreeMap;
use thicket_graph::{
    is_absolute_iri, is_reserved_class, is_valid_datatype, is_valid_label, is_valid_literal_label,
    label_matches_datatype, ClassRepository, Thing, ThingId, ThingRepository, MAX_LABEL_LENGTH,
};

/// Placeholder grammar and uniqueness validation
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderValidator;

impl PlaceholderValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate declared ids and collect them into a set
    ///
    /// # Returns
    /// - `Ok(PlaceholderSet)` with every declared placeholder
    /// - `Err(SymbolError::InvalidPlaceholder)` if an id is not `#name`
    /// - `Err(SymbolError::DuplicatePlaceholders)` with ids declared more
    ///   than once and their counts
    pub fn validate<'i>(
        &self,
        ids: impl IntoIterator<Item = &'i str>,
    ) -> Result<PlaceholderSet, SymbolError> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut declared = PlaceholderSet::new();

        for id in ids {
            let placeholder = Placeholder::parse(id)
                .filter(|p| p.kind() == PlaceholderKind::Temp)
                .ok_or_else(|| SymbolError::InvalidPlaceholder(id.to_string()))?;
            *counts.entry(id).or_insert(0) += 1;
            declared.declare(&placeholder);
        }

        let duplicates: BTreeMap<String, usize> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, count)| (id.to_string(), count))
            .collect();
        if !duplicates.is_empty() {
            return Err(SymbolError::DuplicatePlaceholders(duplicates));
        }

        Ok(declared)
    }
}

/// Rules applied to definition content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionRules {
    /// Maximum label length in characters
    pub max_label_length: usize,
    /// Reject reserved classes on resource definitions
    pub reject_reserved_classes: bool,
}

impl Default for DefinitionRules {
    fn default() -> Self {
        Self {
            max_label_length: MAX_LABEL_LENGTH,
            reject_reserved_classes: true,
        }
    }
}

/// Content validation of thing definitions
pub struct DefinitionValidator<'a> {
    resolver: IdentifierResolver<'a>,
    classes: &'a dyn ClassRepository,
    rules: DefinitionRules,
}

impl<'a> DefinitionValidator<'a> {
    /// Create validator over the store lookups
    #[must_use]
    pub fn new(
        things: &'a dyn ThingRepository,
        classes: &'a dyn ClassRepository,
        rules: DefinitionRules,
    ) -> Self {
        Self {
            resolver: IdentifierResolver::new(things),
            classes,
            rules,
        }
    }

    /// Validate every definition
    ///
    /// Referenced classes and list elements are resolved into `cache`.
    /// The store is never mutated.
    pub fn validate(
        &self,
        definitions: &ThingDefinitions,
        declared: &PlaceholderSet,
        cache: &mut ResolutionCache,
    ) -> Result<(), SymbolError> {
        for (id, class) in &definitions.classes {
            self.check_label(id, &class.label)?;
            if let Some(uri) = &class.uri {
                if !is_absolute_iri(uri) {
                    return Err(SymbolError::UriNotAbsolute(uri.clone()));
                }
                if let Some(existing) = self.classes.find_by_uri(uri)? {
                    return Err(SymbolError::UriAlreadyInUse {
                        uri: uri.clone(),
                        class: existing.id,
                    });
                }
            }
        }

        for (id, resource) in &definitions.resources {
            self.check_label(id, &resource.label)?;
            for class in &resource.classes {
                self.check_class_reference(class, definitions, declared, cache)?;
            }
        }

        for (id, literal) in &definitions.literals {
            if !is_valid_literal_label(&literal.label, self.rules.max_label_length) {
                return Err(SymbolError::InvalidLabel { id: id.clone() });
            }
            if !is_valid_datatype(&literal.datatype) {
                return Err(SymbolError::InvalidLiteralDatatype {
                    id: id.clone(),
                    datatype: literal.datatype.clone(),
                });
            }
            if !label_matches_datatype(&literal.label, &literal.datatype) {
                return Err(SymbolError::InvalidLiteralLabel {
                    id: id.clone(),
                    label: literal.label.clone(),
                    datatype: literal.datatype.clone(),
                });
            }
        }

        for (id, predicate) in &definitions.predicates {
            self.check_label(id, &predicate.label)?;
            if let Some(description) = &predicate.description {
                if !is_valid_literal_label(description, self.rules.max_label_length) {
                    return Err(SymbolError::InvalidLabel { id: id.clone() });
                }
            }
        }

        for (id, list) in &definitions.lists {
            self.check_label(id, &list.label)?;
            for element in &list.elements {
                self.resolver.resolve(element, declared, cache)?;
            }
        }

        Ok(())
    }

    fn check_label(&self, id: &str, label: &str) -> Result<(), SymbolError> {
        if is_valid_label(label, self.rules.max_label_length) {
            Ok(())
        } else {
            Err(SymbolError::InvalidLabel { id: id.to_string() })
        }
    }

    fn check_class_reference(
        &self,
        class: &str,
        definitions: &ThingDefinitions,
        declared: &PlaceholderSet,
        cache: &mut ResolutionCache,
    ) -> Result<(), SymbolError> {
        if self.rules.reject_reserved_classes && !Placeholder::is_placeholder_syntax(class) {
            let id = ThingId::parse(class)?;
            if is_reserved_class(&id) {
                return Err(SymbolError::ReservedClass(id));
            }
        }

        match self.resolver.resolve(class, declared, cache)? {
            Resolution::Placeholder(id) if definitions.classes.contains_key(&id) => Ok(()),
            Resolution::Existing(Thing::Class(_)) => Ok(()),
            _ => Err(SymbolError::ThingIsNotAClass(class.to_string())),
        }
    }
}

impl std::fmt::Debug for DefinitionValidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionValidator")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
