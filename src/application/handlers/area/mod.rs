mod list_areas;

pub use list_areas::ListAreasHandler;
