//! Project catalog
//!
//! The portfolio is reference data compiled into the binary: an ordered
//! list of projects partitioned by category. It is built once at first
//! access and never mutated afterwards; every query is a pure read.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Portfolio category, the catalog's sole partitioning dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Architecture,
    Interiors,
    Landscape,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Architecture => write!(f, "architecture"),
            Category::Interiors => write!(f, "interiors"),
            Category::Landscape => write!(f, "landscape"),
        }
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    /// Unknown strings are an error, not a panic. Callers answer
    /// "not found" for them.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "architecture" => Ok(Category::Architecture),
            "interiors" => Ok(Category::Interiors),
            "landscape" => Ok(Category::Landscape),
            other => Err(crate::Error::NotFound(format!(
                "unknown category: {other}"
            ))),
        }
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Stable unique identifier
    pub id: String,
    /// Display name
    pub title: String,
    pub category: Category,
    /// Ordered image locators; the first is the canonical preview
    pub images: Vec<String>,
    pub location: String,
    pub year: i32,
    pub description: String,
}

impl Project {
    /// A project without at least one image is excluded from gallery
    /// display ("valid project").
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

fn project(id: &str, title: &str, category: Category, images: &[&str]) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        category,
        images: images.iter().map(|s| s.to_string()).collect(),
        location: String::new(),
        year: 2024,
        description: String::new(),
    }
}

static PROJECTS: Lazy<Vec<Project>> = Lazy::new(|| {
    use Category::*;
    vec![
        // Architecture
        project("at-1", "Courtyard House", Architecture, &["/images/architecture/courtyard-house.png"]),
        project("at-2", "Ridge Pavilion", Architecture, &["/images/architecture/ridge-pavilion.png"]),
        project("at-3", "Harbor Annex", Architecture, &["/images/architecture/harbor-annex.png"]),
        project("at-4", "Slate Terrace", Architecture, &["/images/architecture/slate-terrace.png"]),
        project("at-5", "Atrium Offices", Architecture, &["/images/architecture/atrium-offices.png"]),
        project("at-6", "Cedar Footbridge", Architecture, &["/images/architecture/cedar-footbridge.png"]),
        project("at-7", "Gallery Extension", Architecture, &["/images/architecture/gallery-extension.png"]),
        project("at-8", "Hillside Studio", Architecture, &["/images/architecture/hillside-studio.png"]),
        project("at-9", "Brick Commons", Architecture, &["/images/architecture/brick-commons.png"]),
        project("at-10", "Quarry Hall", Architecture, &["/images/architecture/quarry-hall.png"]),
        project("at-11", "Lantern Tower", Architecture, &["/images/architecture/lantern-tower.png"]),
        project("at-12", "Field Chapel", Architecture, &["/images/architecture/field-chapel.png"]),
        project("at-13", "Canal Residence", Architecture, &["/images/architecture/canal-residence.png"]),
        project("at-14", "Timber Market", Architecture, &["/images/architecture/timber-market.png"]),
        project("at-15", "North Library", Architecture, &["/images/architecture/north-library.png"]),
        // Interiors (several entries carry an alternate view)
        project("in-1", "Loft Kitchen", Interiors, &["/images/interiors/loft-kitchen.png", "/images/interiors/loft-kitchen-b.png"]),
        project("in-2", "Reading Room", Interiors, &["/images/interiors/reading-room.png"]),
        project("in-3", "Garden Atelier", Interiors, &["/images/interiors/garden-atelier.png", "/images/interiors/garden-atelier-b.png"]),
        project("in-4", "Stone Bath", Interiors, &["/images/interiors/stone-bath.png", "/images/interiors/stone-bath-b.png"]),
        project("in-5", "Corner Cafe", Interiors, &["/images/interiors/corner-cafe.png"]),
        project("in-6", "Walnut Stair", Interiors, &["/images/interiors/walnut-stair.png"]),
        project("in-7", "Linen Suite", Interiors, &["/images/interiors/linen-suite.png"]),
        project("in-8", "Archive Wall", Interiors, &["/images/interiors/archive-wall.png"]),
        project("in-9", "Winter Lounge", Interiors, &["/images/interiors/winter-lounge.png"]),
        project("in-10", "Plaster Hall", Interiors, &["/images/interiors/plaster-hall.png"]),
        project("in-11", "Clay Showroom", Interiors, &["/images/interiors/clay-showroom.png"]),
        project("in-12", "Studio Mezzanine", Interiors, &["/images/interiors/studio-mezzanine.png"]),
        project("in-13", "Oak Dining", Interiors, &["/images/interiors/oak-dining.png"]),
        project("in-14", "Terrazzo Foyer", Interiors, &["/images/interiors/terrazzo-foyer.png"]),
        project("in-15", "Brass Bar", Interiors, &["/images/interiors/brass-bar.png"]),
        project("in-16", "Quiet Office", Interiors, &["/images/interiors/quiet-office.png"]),
        project("in-17", "Gallery Nook", Interiors, &["/images/interiors/gallery-nook.png"]),
        project("in-18", "Atelier Entry", Interiors, &["/images/interiors/atelier-entry.png"]),
        // Landscape
        project("ln-1", "Meadow Court", Landscape, &["/images/landscape/meadow-court.png"]),
        project("ln-2", "Birch Walk", Landscape, &["/images/landscape/birch-walk.png"]),
        project("ln-3", "Terraced Orchard", Landscape, &["/images/landscape/terraced-orchard.png"]),
        project("ln-4", "Pond Garden", Landscape, &["/images/landscape/pond-garden.png"]),
        project("ln-5", "Gravel Courtyard", Landscape, &["/images/landscape/gravel-courtyard.png"]),
    ]
});

/// All projects in catalog order
pub fn all_projects() -> &'static [Project] {
    &PROJECTS
}

/// Projects matching `category`, preserving catalog order.
/// `None` returns the whole catalog.
pub fn projects_by_category(category: Option<Category>) -> Vec<&'static Project> {
    match category {
        None => PROJECTS.iter().collect(),
        Some(cat) => PROJECTS.iter().filter(|p| p.category == cat).collect(),
    }
}

/// Look up a single project by id
pub fn project_by_id(id: &str) -> Option<&'static Project> {
    PROJECTS.iter().find(|p| p.id == id)
}

/// The fixed category enumeration
pub fn all_categories() -> [Category; 3] {
    [Category::Architecture, Category::Interiors, Category::Landscape]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for cat in all_categories() {
            assert_eq!(cat.to_string().parse::<Category>().unwrap(), cat);
        }
    }

    #[test]
    fn test_unknown_category_is_not_found() {
        let err = "sculpture".parse::<Category>().unwrap_err();
        assert!(matches!(err, crate::Error::NotFound(_)));
    }

    #[test]
    fn test_category_filter_preserves_order() {
        let landscape = projects_by_category(Some(Category::Landscape));
        assert_eq!(landscape.len(), 5);
        let ids: Vec<&str> = landscape.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["ln-1", "ln-2", "ln-3", "ln-4", "ln-5"]);
        assert!(landscape.iter().all(|p| p.category == Category::Landscape));
    }

    #[test]
    fn test_no_category_returns_all() {
        assert_eq!(projects_by_category(None).len(), all_projects().len());
    }

    #[test]
    fn test_project_by_id() {
        let p = project_by_id("in-3").expect("in-3 exists");
        assert_eq!(p.title, "Garden Atelier");
        assert_eq!(p.images.len(), 2);
        assert!(project_by_id("zz-99").is_none());
    }

    #[test]
    fn test_every_entry_has_a_preview_image() {
        // The compiled-in catalog should never ship an imageless entry;
        // the gallery still filters defensively.
        assert!(all_projects().iter().all(Project::has_images));
    }
}
