use crate::binding::{self, MapSurface};
use crate::config::MapConfig;
use crate::error::MapError;
use crate::facility::{Facility, FacilityCollection};
use crate::metrics::{count_selected, Headline, HeadlineSource, MetricsSummary, SelectionCounts};
use crate::selection::{Selection, SelectionAction};
use crate::style::{evaluate, FeatureStyle, StylePolicy};

/// Owns the selection for a session and the data it applies to.
#[derive(Debug, Clone)]
pub struct MapController {
    collection: FacilityCollection,
    policy: StylePolicy,
    selection: Selection,
    summary: Option<MetricsSummary>,
    headline_source: HeadlineSource,
}

impl MapController {
    pub fn new(collection: FacilityCollection, config: &MapConfig) -> Self {
        Self {
            collection,
            policy: config.style.clone(),
            selection: Selection::from_modes(config.initial_modes.iter().copied()),
            summary: None,
            headline_source: config.headline_source,
        }
    }

    pub const fn collection(&self) -> &FacilityCollection {
        &self.collection
    }

    pub fn facilities(&self) -> &[Facility] {
        self.collection.facilities()
    }

    pub const fn policy(&self) -> &StylePolicy {
        &self.policy
    }

    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_summary(&mut self, summary: Option<MetricsSummary>) {
        self.summary = summary;
    }

    /// Updates the selection and returns the headline for the new state.
    pub fn apply_action(&mut self, action: SelectionAction) -> Headline {
        let selection = std::mem::take(&mut self.selection);
        self.selection = selection.apply(action);
        log::debug!("selection now {:?}", self.selection);
        self.headline()
    }

    /// Updates the selection and reapplies filters and paint on `surface` before returning.
    pub fn dispatch<S: MapSurface>(
        &mut self,
        action: SelectionAction,
        surface: &mut S,
    ) -> Result<Headline, MapError> {
        let headline = self.apply_action(action);
        binding::apply(surface, &self.policy, &self.selection)?;
        Ok(headline)
    }

    pub fn counts(&self) -> SelectionCounts {
        count_selected(
            self.collection.facilities(),
            &self.selection,
            self.policy.empty_selection,
        )
    }

    pub fn headline(&self) -> Headline {
        Headline::resolve(
            self.headline_source,
            self.summary.as_ref(),
            self.counts().percentage(),
        )
    }

    pub fn style_for(&self, facility: &Facility, zoom: f64) -> FeatureStyle {
        evaluate(&self.policy, &self.selection, zoom, facility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::tests::{collection, RecordingSurface};
    use crate::binding::{bind, FitOptions};
    use crate::domain::Mode;
    use crate::metrics::OverallMetrics;

    fn live_config() -> MapConfig {
        MapConfig {
            headline_source: HeadlineSource::Live,
            ..MapConfig::default()
        }
    }

    #[test]
    fn starts_from_configured_modes() {
        let config = MapConfig {
            initial_modes: vec![Mode::Air],
            ..MapConfig::default()
        };
        let controller = MapController::new(collection(&[Some([0.0, 0.0])]), &config);
        assert_eq!(controller.selection(), &Selection::from_modes([Mode::Air]));
    }

    #[test]
    fn dispatch_reapplies_layers_synchronously() {
        let mut surface = RecordingSurface::default();
        let mut controller = MapController::new(collection(&[Some([-100.0, 40.0])]), &live_config());
        let _ = bind(
            &mut surface,
            controller.collection(),
            controller.policy(),
            controller.selection(),
            FitOptions {
                padding: 0.0,
                duration_ms: 0,
            },
        );

        let headline = controller
            .dispatch(SelectionAction::Clear, &mut surface)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(headline, Headline(None));
        assert_eq!(surface.filters.len(), 3);
        assert_eq!(surface.filters["facilities-hubs"][1], serde_json::json!(false));

        let headline = controller
            .dispatch(SelectionAction::Toggle(Mode::Rail), &mut surface)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(headline, Headline(Some(100)));
    }

    #[test]
    fn precomputed_headline_ignores_selection() {
        let mut controller = MapController::new(collection(&[Some([0.0, 0.0])]), &MapConfig::default());
        controller.set_summary(Some(MetricsSummary {
            overall: OverallMetrics {
                true_intermodal_pct: Some(37.0),
            },
        }));
        assert_eq!(controller.apply_action(SelectionAction::Clear), Headline(Some(37)));
    }

    #[test]
    fn style_follows_selection() {
        let mut controller = MapController::new(collection(&[Some([0.0, 0.0])]), &live_config());
        let facility = controller.facilities()[0].clone();
        assert!(controller.style_for(&facility, 10.0).selected);
        controller.apply_action(SelectionAction::Clear);
        assert!(!controller.style_for(&facility, 10.0).selected);
    }
}
