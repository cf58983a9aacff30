use crate::model::WeatherFields;

/// Output surface for a lookup: a weather panel and a not-found panel,
/// exactly one of which is visible after a query completes.
pub trait DisplayPort: Send + Sync {
    /// Hide the not-found panel, show the weather panel and write all five fields.
    fn show_found(&self, fields: &WeatherFields);

    /// Show the not-found panel and hide the weather panel. Field values are left as they are.
    fn show_not_found(&self);
}
