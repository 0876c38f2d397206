//! The in-progress selection and the records derived from it

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::identity::{FinishId, MaterialId, ProcessId};

/// Where the current tolerance value came from
///
/// A plain `Option<f64>` cannot tell "never touched" apart from "cleared by
/// the user", so the material default is only applied while the state is not
/// [`ToleranceState::Chosen`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum ToleranceState {
    /// No material default and no user choice
    #[default]
    Unset,
    /// Taken from the selected material's default
    Derived(f64),
    /// Picked (or explicitly cleared) by the user
    Chosen(Option<f64>),
}

impl ToleranceState {
    /// The tolerance value, if any
    pub fn value(&self) -> Option<f64> {
        match self {
            ToleranceState::Unset => None,
            ToleranceState::Derived(v) => Some(*v),
            ToleranceState::Chosen(v) => *v,
        }
    }

    /// Whether the user has taken ownership of the value
    pub fn is_chosen(&self) -> bool {
        matches!(self, ToleranceState::Chosen(_))
    }
}

/// The user's in-progress choices
///
/// Mutated only through [`Engine`](crate::core::Engine). Material and finish
/// are held by id and resolved against the catalog on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub process_id: Option<ProcessId>,
    pub material: Option<MaterialId>,
    pub finish: Option<FinishId>,
    pub quantity: u32,
    pub custom_material: Option<String>,
    pub custom_finish: Option<String>,
    pub color: Option<String>,
    pub infill: Option<String>,
    pub tolerance: ToleranceState,
    pub threads: u32,
    pub inserts: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            process_id: None,
            material: None,
            finish: None,
            quantity: 1,
            custom_material: None,
            custom_finish: None,
            color: None,
            infill: None,
            tolerance: ToleranceState::Unset,
            threads: 1,
            inserts: 1,
        }
    }
}

impl Selection {
    /// Reset the fields that only make sense for one material
    pub(crate) fn reset_material_scoped(&mut self) {
        self.finish = None;
        self.custom_material = None;
        self.custom_finish = None;
        self.color = None;
        self.infill = None;
        self.tolerance = ToleranceState::Unset;
    }

    /// Shallow-merge a partial update
    pub(crate) fn apply(&mut self, update: FieldUpdate) {
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(custom_material) = update.custom_material {
            self.custom_material = custom_material;
        }
        if let Some(custom_finish) = update.custom_finish {
            self.custom_finish = custom_finish;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(infill) = update.infill {
            self.infill = infill;
        }
        if let Some(tolerance) = update.tolerance {
            self.tolerance = ToleranceState::Chosen(tolerance);
        }
        if let Some(threads) = update.threads {
            self.threads = threads;
        }
        if let Some(inserts) = update.inserts {
            self.inserts = inserts;
        }
    }
}

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A partial update of the free-form selection fields
///
/// Outer `None` leaves a field untouched; for nullable fields `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldUpdate {
    #[serde(default)]
    pub quantity: Option<u32>,

    #[serde(default, deserialize_with = "double_option")]
    pub custom_material: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub custom_finish: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub infill: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub tolerance: Option<Option<f64>>,

    #[serde(default)]
    pub threads: Option<u32>,

    #[serde(default)]
    pub inserts: Option<u32>,
}

impl FieldUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn custom_material(mut self, text: impl Into<String>) -> Self {
        self.custom_material = Some(Some(text.into()));
        self
    }

    pub fn custom_finish(mut self, text: impl Into<String>) -> Self {
        self.custom_finish = Some(Some(text.into()));
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(Some(color.into()));
        self
    }

    pub fn infill(mut self, infill: impl Into<String>) -> Self {
        self.infill = Some(Some(infill.into()));
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(Some(tolerance));
        self
    }

    /// Explicitly clear the tolerance (counts as a user choice)
    pub fn clear_tolerance(mut self) -> Self {
        self.tolerance = Some(None);
        self
    }

    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn inserts(mut self, inserts: u32) -> Self {
        self.inserts = Some(inserts);
        self
    }

    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The flat property bundle handed to a submission sink
///
/// `materialId` and `finishId` are omitted when unset; every other optional
/// key is written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub quantity: u32,
    pub process_id: Option<ProcessId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_id: Option<MaterialId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_id: Option<FinishId>,
    pub custom_material: Option<String>,
    pub custom_finish: Option<String>,
    pub color: Option<String>,
    pub infill: Option<String>,
    pub tolerance: Option<f64>,
    pub threads: u32,
    pub inserts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_defaults() {
        let selection = Selection::default();
        assert_eq!(selection.quantity, 1);
        assert_eq!(selection.threads, 1);
        assert_eq!(selection.inserts, 1);
        assert_eq!(selection.process_id, None);
        assert_eq!(selection.tolerance, ToleranceState::Unset);
    }

    #[test]
    fn test_tolerance_state_value() {
        assert_eq!(ToleranceState::Unset.value(), None);
        assert_eq!(ToleranceState::Derived(0.05).value(), Some(0.05));
        assert_eq!(ToleranceState::Chosen(None).value(), None);
        assert!(ToleranceState::Chosen(None).is_chosen());
        assert!(!ToleranceState::Derived(0.1).is_chosen());
    }

    #[test]
    fn test_apply_is_shallow_merge() {
        let mut selection = Selection {
            color: Some("Black".to_string()),
            ..Selection::default()
        };
        selection.apply(FieldUpdate::new().quantity(5).infill("20%"));

        assert_eq!(selection.quantity, 5);
        assert_eq!(selection.infill.as_deref(), Some("20%"));
        assert_eq!(selection.color.as_deref(), Some("Black"));
        assert_eq!(selection.threads, 1);
    }

    #[test]
    fn test_apply_tolerance_marks_chosen() {
        let mut selection = Selection {
            tolerance: ToleranceState::Derived(0.05),
            ..Selection::default()
        };
        selection.apply(FieldUpdate::new().clear_tolerance());
        assert_eq!(selection.tolerance, ToleranceState::Chosen(None));
    }

    #[test]
    fn test_field_update_absent_vs_null() {
        let update: FieldUpdate =
            serde_json::from_str(r#"{"color": null, "quantity": 3}"#).unwrap();
        assert_eq!(update.color, Some(None));
        assert_eq!(update.infill, None);
        assert_eq!(update.quantity, Some(3));
        assert!(!update.is_empty());
        assert!(FieldUpdate::new().is_empty());
    }

    #[test]
    fn test_field_update_rejects_unknown_keys() {
        let result = serde_json::from_str::<FieldUpdate>(r#"{"processId": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_submission_record_omits_unset_ids() {
        let record = SubmissionRecord {
            quantity: 1,
            process_id: Some(ProcessId(1)),
            material_id: None,
            finish_id: None,
            custom_material: None,
            custom_finish: None,
            color: None,
            infill: None,
            tolerance: None,
            threads: 1,
            inserts: 1,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("materialId").is_none());
        assert!(json.get("finishId").is_none());
        assert!(json.get("color").unwrap().is_null());
    }
}
