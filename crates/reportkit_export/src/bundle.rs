//! Named, ordered collection of record datasets handed to an exporter.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::record::ExportRecord;

/// Type-erased record stored in a bundle.
pub type BoxedRecord = Box<dyn ExportRecord>;

/// Ordered mapping `dataset name -> records`.
///
/// Iteration follows first insertion of each name. Re-adding a name replaces
/// its records in place, so the section keeps its original position.
#[derive(Default)]
pub struct ReportBundle {
    dict_datasets: IndexMap<String, Vec<BoxedRecord>>,
}

impl ReportBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle holding a single dataset named `title`.
    pub fn from_records<T, I>(title: impl Into<String>, items: I) -> Self
    where
        T: ExportRecord + 'static,
        I: IntoIterator<Item = T>,
    {
        let mut bundle = Self::new();
        bundle.add(title, items);
        bundle
    }

    /// Store `items` under `name`, replacing any dataset with the same name.
    pub fn add<T, I>(&mut self, name: impl Into<String>, items: I)
    where
        T: ExportRecord + 'static,
        I: IntoIterator<Item = T>,
    {
        let l_records = collect_boxed(items);
        self.insert(name.into(), l_records);
    }

    /// Store `items` under a generated unique name; returns that name.
    pub fn add_unnamed<T, I>(&mut self, items: I) -> String
    where
        T: ExportRecord + 'static,
        I: IntoIterator<Item = T>,
    {
        self.add_optional(None, Some(items))
    }

    /// General form of [`Self::add`].
    ///
    /// A missing name is replaced by a generated unique one and missing items
    /// are stored as an empty dataset. Returns the name actually used.
    pub fn add_optional<T, I>(&mut self, name: Option<&str>, items: Option<I>) -> String
    where
        T: ExportRecord + 'static,
        I: IntoIterator<Item = T>,
    {
        let c_name = match name {
            Some(val) => val.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        let l_records = items.map(collect_boxed).unwrap_or_default();
        self.insert(c_name.clone(), l_records);
        c_name
    }

    /// Datasets in insertion order.
    pub fn get_all(&self) -> impl Iterator<Item = (&str, &[BoxedRecord])> + '_ {
        self.dict_datasets
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Records stored under `name`.
    pub fn get(&self, name: &str) -> Option<&[BoxedRecord]> {
        self.dict_datasets.get(name).map(Vec::as_slice)
    }

    /// Dataset names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.dict_datasets.keys().map(String::as_str).collect()
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.dict_datasets.len()
    }

    /// `true` when no dataset was added.
    pub fn is_empty(&self) -> bool {
        self.dict_datasets.is_empty()
    }

    fn insert(&mut self, name: String, records: Vec<BoxedRecord>) {
        if self.dict_datasets.contains_key(&name) {
            tracing::debug!(dataset = %name, "replacing dataset already present in bundle");
        }
        self.dict_datasets.insert(name, records);
    }
}

impl std::fmt::Debug for ReportBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.dict_datasets
                    .iter()
                    .map(|(name, records)| (name, records.len())),
            )
            .finish()
    }
}

fn collect_boxed<T, I>(items: I) -> Vec<BoxedRecord>
where
    T: ExportRecord + 'static,
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .map(|item| Box::new(item) as BoxedRecord)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordRow;

    fn rows(n: usize) -> Vec<RecordRow> {
        (0..n).map(|idx| RecordRow::new().with("Idx", idx)).collect()
    }

    #[test]
    fn get_all_follows_insertion_order() {
        let mut bundle = ReportBundle::new();
        bundle.add("Applicants", rows(2));
        bundle.add("Summary", rows(1));
        bundle.add("Jobs", rows(0));

        let l_entries: Vec<(&str, usize)> = bundle
            .get_all()
            .map(|(name, records)| (name, records.len()))
            .collect();
        assert_eq!(
            l_entries,
            vec![("Applicants", 2), ("Summary", 1), ("Jobs", 0)]
        );
    }

    #[test]
    fn re_adding_a_name_replaces_records_in_place() {
        let mut bundle = ReportBundle::new();
        bundle.add("A", rows(1));
        bundle.add("B", rows(1));
        bundle.add("A", rows(3));

        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.names(), vec!["A", "B"]);
        assert_eq!(bundle.get("A").map(<[BoxedRecord]>::len), Some(3));
    }

    #[test]
    fn missing_name_generates_unique_entries() {
        let mut bundle = ReportBundle::new();
        let c_name_1 = bundle.add_unnamed(rows(1));
        let c_name_2 = bundle.add_optional(None, Some(rows(2)));

        assert_ne!(c_name_1, c_name_2);
        assert_eq!(bundle.len(), 2);
        assert!(Uuid::parse_str(&c_name_1).is_ok());
    }

    #[test]
    fn missing_items_are_stored_as_empty_dataset() {
        let mut bundle = ReportBundle::new();
        let c_name = bundle.add_optional(Some("Empty"), None::<Vec<RecordRow>>);

        assert_eq!(c_name, "Empty");
        assert_eq!(bundle.get("Empty").map(<[BoxedRecord]>::len), Some(0));
    }

    #[test]
    fn from_records_wraps_a_single_dataset() {
        let bundle = ReportBundle::from_records("Report", rows(4));
        assert_eq!(bundle.names(), vec!["Report"]);
        assert_eq!(format!("{bundle:?}"), "{\"Report\": 4}");
    }
}
