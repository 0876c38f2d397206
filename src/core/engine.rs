//! Selection engine - cascading process → material → finish selection
//!
//! The engine owns the current [`Selection`] and derives every option set
//! from the catalog on read. Setters enforce the cascade:
//!
//! - choosing a process resets everything downstream, quantity included
//! - choosing a material resets the finish and the material-scoped fields
//!   (color, infill, tolerance, custom texts) but keeps quantity, threads and
//!   inserts
//! - choosing a finish changes nothing else
//!
//! Derived state (currently the tolerance default) is recomputed by an
//! explicit call at the end of each setter that changes the material.
//!
//! No operation fails. Unknown or non-selectable ids leave the affected
//! choice unset, which shows up as empty option sets.

use serde::Serialize;

use crate::core::catalog::Catalog;
use crate::core::identity::{FinishId, MaterialId, ProcessId};
use crate::core::selection::{FieldUpdate, Selection, SubmissionRecord, ToleranceState};
use crate::core::sink::{SinkError, SubmissionSink};
use crate::entities::{Finish, Material, Process};

/// Holds the in-progress selection over a read-only catalog
#[derive(Debug, Clone)]
pub struct Engine<'c> {
    catalog: &'c Catalog,
    selection: Selection,
}

impl<'c> Engine<'c> {
    /// Start a session with a default selection
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            selection: Selection::default(),
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // ------------------------------------------------------------------
    // Write surface
    // ------------------------------------------------------------------

    /// Choose a process, resetting every downstream field to its default
    pub fn set_process(&mut self, process: ProcessId) {
        if self.catalog.process(process).is_none() {
            tracing::debug!(%process, "process not in catalog");
        }

        self.selection = Selection {
            process_id: Some(process),
            ..Selection::default()
        };
    }

    /// Choose a material by id
    pub fn set_material(&mut self, material: MaterialId) {
        self.apply_material(Some(material));
    }

    /// Choose a material by its position in the catalog's material list
    pub fn set_material_at(&mut self, index: usize) {
        let material = self.catalog.material_at(index).map(|m| m.id);
        if material.is_none() {
            tracing::debug!(index, "material index out of range");
        }
        self.apply_material(material);
    }

    fn apply_material(&mut self, material: Option<MaterialId>) {
        self.selection.reset_material_scoped();
        self.selection.material = material.filter(|id| self.material_selectable(*id));
        self.recompute_derived();
    }

    fn material_selectable(&self, id: MaterialId) -> bool {
        let Some(process) = self.selection.process_id else {
            tracing::warn!(material = %id, "material chosen before a process");
            return false;
        };

        match self.catalog.material(id) {
            Some(material) if material.is_selectable_for(process) => true,
            Some(_) => {
                tracing::warn!(material = %id, %process, "material not selectable for process");
                false
            }
            None => {
                tracing::debug!(material = %id, "material not in catalog");
                false
            }
        }
    }

    /// Choose a finish by id; other fields are left alone
    pub fn set_finish(&mut self, finish: FinishId) {
        self.apply_finish(Some(finish));
    }

    /// Choose a finish by its position in the catalog's finish list
    pub fn set_finish_at(&mut self, index: usize) {
        let finish = self.catalog.finish_at(index).map(|f| f.id);
        if finish.is_none() {
            tracing::debug!(index, "finish index out of range");
        }
        self.apply_finish(finish);
    }

    fn apply_finish(&mut self, finish: Option<FinishId>) {
        self.selection.finish = finish.filter(|id| {
            let offered = self.available_finishes().any(|f| f.id == *id);
            if !offered {
                tracing::warn!(finish = %id, "finish not offered for current selection");
            }
            offered
        });
    }

    /// Shallow-merge free-form fields into the selection
    pub fn update_fields(&mut self, update: FieldUpdate) {
        self.selection.apply(update);
    }

    /// Re-derive fields that follow the material
    ///
    /// The tolerance takes the material default unless the user has chosen
    /// (or cleared) one.
    fn recompute_derived(&mut self) {
        if self.selection.tolerance.is_chosen() {
            return;
        }

        self.selection.tolerance = match self.selected_material().and_then(|m| m.default_tolerance()) {
            Some(default) => ToleranceState::Derived(default),
            None => ToleranceState::Unset,
        };
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Number of materials selectable under the current process
    pub fn available_material_count(&self) -> usize {
        self.available_materials().count()
    }

    /// Whether any finish is offered for the current process and material
    pub fn finish_visible(&self) -> bool {
        self.available_finishes().next().is_some()
    }

    /// Processes the user may pick from
    pub fn active_processes(&self) -> impl Iterator<Item = &'c Process> {
        self.catalog.active_processes()
    }

    /// Materials selectable under the current process
    pub fn available_materials(&self) -> impl Iterator<Item = &'c Material> {
        let catalog = self.catalog;
        self.selection
            .process_id
            .into_iter()
            .flat_map(move |process| catalog.materials_for(process))
    }

    /// Finishes offered for the current process and material
    pub fn available_finishes(&self) -> impl Iterator<Item = &'c Finish> {
        let catalog = self.catalog;
        let material = self.selection.material;
        self.selection
            .process_id
            .into_iter()
            .flat_map(move |process| catalog.finishes_for(process, material))
    }

    pub fn selected_process(&self) -> Option<&'c Process> {
        self.selection.process_id.and_then(|id| self.catalog.process(id))
    }

    pub fn selected_material(&self) -> Option<&'c Material> {
        self.selection.material.and_then(|id| self.catalog.material(id))
    }

    pub fn selected_finish(&self) -> Option<&'c Finish> {
        self.selection.finish.and_then(|id| self.catalog.finish(id))
    }

    /// Colors offered by the selected material
    pub fn color_options(&self) -> &'c [String] {
        self.selected_material().map(|m| m.color.as_slice()).unwrap_or(&[])
    }

    /// Infill densities offered by the selected material
    pub fn infill_options(&self) -> &'c [String] {
        self.selected_material().map(|m| m.infill.as_slice()).unwrap_or(&[])
    }

    /// Tolerances offered by the selected material
    pub fn tolerance_options(&self) -> &'c [f64] {
        self.selected_material()
            .map(|m| m.tolerance_options())
            .unwrap_or(&[])
    }

    /// Whether a custom material description applies
    pub fn custom_material_visible(&self) -> bool {
        self.selected_material().is_some_and(|m| m.is_custom)
    }

    /// Whether a custom finish description applies
    pub fn custom_finish_visible(&self) -> bool {
        self.selected_finish().is_some_and(|f| f.is_custom)
    }

    /// Tolerance to show the user: the current value, falling back to the material default
    pub fn displayed_tolerance(&self) -> Option<f64> {
        self.selection
            .tolerance
            .value()
            .or_else(|| self.selected_material().and_then(|m| m.default_tolerance()))
    }

    /// Snapshot of every derived view
    pub fn view(&self) -> OptionsView<'c> {
        OptionsView {
            process: self.selected_process(),
            material: self.selected_material(),
            finish: self.selected_finish(),
            processes: self.active_processes().collect(),
            available_material_count: self.available_material_count(),
            materials: self.available_materials().collect(),
            finish_visible: self.finish_visible(),
            finishes: self.available_finishes().collect(),
            colors: self.color_options(),
            infills: self.infill_options(),
            tolerances: self.tolerance_options(),
            displayed_tolerance: self.displayed_tolerance(),
            custom_material_visible: self.custom_material_visible(),
            custom_finish_visible: self.custom_finish_visible(),
        }
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Assemble the flat submission record without submitting
    ///
    /// Custom texts are only carried when the selected record is custom.
    pub fn record(&self) -> SubmissionRecord {
        let s = &self.selection;
        SubmissionRecord {
            quantity: s.quantity,
            process_id: s.process_id,
            material_id: s.material,
            finish_id: s.finish,
            custom_material: s
                .custom_material
                .clone()
                .filter(|_| self.custom_material_visible()),
            custom_finish: s
                .custom_finish
                .clone()
                .filter(|_| self.custom_finish_visible()),
            color: s.color.clone(),
            infill: s.infill.clone(),
            tolerance: s.tolerance.value(),
            threads: s.threads,
            inserts: s.inserts,
        }
    }

    /// Hand the current selection to a sink and start over
    ///
    /// No validation is performed. The selection is only reset when the sink
    /// accepts the record.
    pub fn submit<S: SubmissionSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<SubmissionRecord, SinkError> {
        let record = self.record();
        sink.submit(&record)?;
        tracing::debug!(
            process = ?record.process_id,
            material = ?record.material_id,
            "selection submitted, resetting"
        );
        self.selection = Selection::default();
        Ok(record)
    }
}

/// Read-only snapshot of what the presentation layer can show
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsView<'c> {
    pub process: Option<&'c Process>,
    pub material: Option<&'c Material>,
    pub finish: Option<&'c Finish>,
    pub processes: Vec<&'c Process>,
    pub available_material_count: usize,
    pub materials: Vec<&'c Material>,
    pub finish_visible: bool,
    pub finishes: Vec<&'c Finish>,
    pub colors: &'c [String],
    pub infills: &'c [String],
    pub tolerances: &'c [f64],
    pub displayed_tolerance: Option<f64>,
    pub custom_material_visible: bool,
    pub custom_finish_visible: bool,
}
