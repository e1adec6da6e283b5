use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::graph::SceneGraph;
use super::model::FarmModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Fields,
    Crops,
    Livestock,
    Equipment,
}

impl View {
    pub const ALL: [View; 4] = [View::Fields, View::Crops, View::Livestock, View::Equipment];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Fields => "fields",
            View::Crops => "crops",
            View::Livestock => "livestock",
            View::Equipment => "equipment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Fields => "Fields",
            View::Crops => "Crops",
            View::Livestock => "Livestock",
            View::Equipment => "Equipment",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fields" => Ok(View::Fields),
            "crops" => Ok(View::Crops),
            "livestock" => Ok(View::Livestock),
            "equipment" => Ok(View::Equipment),
            other => Err(format!(
                "Unknown view '{}'. Expected one of: fields, crops, livestock, equipment",
                other
            )),
        }
    }
}

impl FarmModel {
    /// Hides every handle in all four collections, then shows the fields
    /// plus the collection `view` names. `None` leaves everything hidden.
    pub fn apply_view(&self, graph: &mut SceneGraph, view: Option<View>) {
        for id in self.all_nodes() {
            graph.set_visible(id, false);
        }

        let Some(view) = view else {
            return;
        };

        for id in &self.fields {
            graph.set_visible(*id, true);
        }

        match view {
            View::Fields => {}
            View::Crops => self.crop_nodes().for_each(|id| graph.set_visible(id, true)),
            View::Livestock => self
                .livestock_nodes()
                .for_each(|id| graph.set_visible(id, true)),
            View::Equipment => self
                .equipment_nodes()
                .for_each(|id| graph.set_visible(id, true)),
        }
    }

    /// Name-based entry point used by UI routing. Unknown names hide all four
    /// collections and are otherwise ignored.
    pub fn apply_view_by_name(&self, graph: &mut SceneGraph, name: &str) -> Option<View> {
        let view = name.parse::<View>().ok();
        if view.is_none() {
            log::debug!("ignoring unknown view {:?}", name);
        }
        self.apply_view(graph, view);
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_parse_and_display() {
        for view in View::ALL {
            assert_eq!(view.to_string().parse::<View>(), Ok(view));
        }
        assert_eq!(" Crops ".parse::<View>(), Ok(View::Crops));
        assert!("orchard".parse::<View>().is_err());
    }

    #[test]
    fn test_view_default_is_fields() {
        assert_eq!(View::default(), View::Fields);
    }

    #[test]
    fn test_view_deserialize_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            view: View,
        }
        let w: Wrapper = toml::from_str("view = \"livestock\"").unwrap();
        assert_eq!(w.view, View::Livestock);
    }
}
