mod ids;
mod selection;
mod suspend_data;
mod taxonomy;

pub use ids::{CategoryId, IdError, IndicatorId, SubCompetencyId};
pub use selection::{SelectionMap, SelectionState};
pub use suspend_data::SuspendDataError;
pub use taxonomy::{CompetencyCategory, Indicator, SubCompetency, Taxonomy, TaxonomyError};
