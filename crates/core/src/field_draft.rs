//! In-memory editor for a form's ordered question list.
//!
//! The admin API loads a form's fields into a [`FieldDraft`], applies one
//! operation, then persists the whole array. Reordering is a neighbour swap
//! and a no-op at either end of the list.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::fields::{new_field_id, Field, FieldInput};

/// Maximum number of questions on one form.
pub const MAX_FIELDS: usize = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDraft {
    fields: Vec<Field>,
}

impl FieldDraft {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Build a draft from a full list of admin inputs.
    ///
    /// Inputs carrying an `id` keep it; the rest get a fresh one.
    pub fn from_inputs(inputs: &[FieldInput]) -> Result<Self, CoreError> {
        let fields = inputs
            .iter()
            .map(|input| {
                let id = input
                    .id
                    .clone()
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(new_field_id);
                Field::from_input(id, input)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Append a new question with a freshly minted id.
    pub fn add(&mut self, input: &FieldInput) -> Result<&Field, CoreError> {
        if self.fields.len() >= MAX_FIELDS {
            return Err(CoreError::Validation(format!(
                "A form cannot have more than {MAX_FIELDS} questions"
            )));
        }
        let field = Field::from_input(new_field_id(), input)?;
        self.fields.push(field);
        Ok(&self.fields[self.fields.len() - 1])
    }

    /// Replace the question at `index`, keeping its id.
    pub fn edit(&mut self, index: usize, input: &FieldInput) -> Result<&Field, CoreError> {
        let id = self.slot(index)?.id.clone();
        let field = Field::from_input(id, input)?;
        self.fields[index] = field;
        Ok(&self.fields[index])
    }

    /// Swap the question at `index` with the one above it.
    ///
    /// Returns `false` (and changes nothing) for the first row or an
    /// out-of-range index.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.fields.len() {
            return false;
        }
        self.fields.swap(index - 1, index);
        true
    }

    /// Swap the question at `index` with the one below it.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.fields.len().saturating_sub(1) {
            return false;
        }
        self.fields.swap(index, index + 1);
        true
    }

    /// Remove and return the question at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Field, CoreError> {
        self.slot(index)?;
        Ok(self.fields.remove(index))
    }

    /// Check the draft can be persisted: non-empty, bounded, unique ids.
    pub fn validate_for_save(&self) -> Result<(), CoreError> {
        if self.fields.is_empty() {
            return Err(CoreError::Validation(
                "Add at least one question before saving".into(),
            ));
        }
        if self.fields.len() > MAX_FIELDS {
            return Err(CoreError::Validation(format!(
                "A form cannot have more than {MAX_FIELDS} questions"
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.fields.iter().find(|f| !seen.insert(f.id.as_str())) {
            return Err(CoreError::Validation(format!(
                "Duplicate question id '{}'",
                dup.id
            )));
        }
        Ok(())
    }

    fn slot(&self, index: usize) -> Result<&Field, CoreError> {
        self.fields.get(index).ok_or_else(|| {
            CoreError::Validation(format!(
                "No question at position {index} (form has {})",
                self.fields.len()
            ))
        })
    }
}
