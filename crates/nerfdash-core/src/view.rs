//! Table view state: column visibility, aggregation selection, group-by,
//! sort and pagination, owned by the page and passed into the engines.
//!
//! Setters validate names through the closed vocabularies; unknown names
//! are filtered out, never aggregated by accident.

use crate::models::{Field, MetricKey};
use crate::sort::SortState;

pub const PER_PAGE_CHOICES: [usize; 5] = [5, 10, 20, 50, 100];

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub visible_columns: Vec<Field>,
    pub group_by: Option<Field>,
    pub aggregations: Vec<MetricKey>,
    pub sort: SortState,
    /// 1-based current page.
    pub page: usize,
    pub per_page: usize,
}

impl Default for ViewState {
    /// The initial dashboard state: every column visible, every metric
    /// aggregated, no grouping, no sort.
    fn default() -> Self {
        Self {
            visible_columns: Field::all().collect(),
            group_by: None,
            aggregations: MetricKey::ALL.to_vec(),
            sort: SortState::default(),
            page: 1,
            per_page: 10,
        }
    }
}

impl ViewState {
    /// Replace the visible-column selection. Order is canonical column
    /// order, not selection order; unknown names are dropped.
    pub fn set_visible_columns<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        let wanted: Vec<&str> = names.into_iter().collect();
        self.visible_columns = Field::all()
            .filter(|f| wanted.contains(&f.as_str()))
            .collect();
    }

    /// Replace the aggregation selection, keeping only names inside the
    /// metric vocabulary.
    pub fn set_aggregations<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.aggregations = names
            .into_iter()
            .filter_map(MetricKey::parse)
            .collect();
    }

    /// Set or clear the group-by field; unknown names clear it.
    pub fn set_group_by(&mut self, name: Option<&str>) {
        self.group_by = name.and_then(Field::parse);
    }

    pub fn toggle_sort(&mut self, column: Field) {
        self.sort.toggle(column);
    }

    pub fn is_visible(&self, field: Field) -> bool {
        self.visible_columns.contains(&field)
    }

    pub fn is_aggregated(&self, metric: MetricKey) -> bool {
        self.aggregations.contains(&metric)
    }

    // ─── Pagination ──────────────────────────────────────────────────────

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.per_page).max(1)
    }

    /// Clamp the current page into range for `total` items.
    pub fn clamp_page(&mut self, total: usize) {
        self.page = self.page.clamp(1, self.page_count(total));
    }

    /// Half-open index range of the current page.
    pub fn page_bounds(&self, total: usize) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.per_page).min(total);
        let end = (start + self.per_page).min(total);
        (start, end)
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        // Changing the window resets to the first page.
        self.page = 1;
    }

    /// Slice of `items` on the current page.
    pub fn paginate<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let (start, end) = self.page_bounds(items.len());
        &items[start..end]
    }
}
