use super::dedupe::{dedupe, DedupeOrder};
use super::filter::{filter, FilterCriteria};
use super::model::Record;
use super::paginate::{clamp_page, paginate, Page, PageSize};
use super::sort::{sort, SortSpec};

/// Everything that decides which rows a screen shows and in what order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub criteria: FilterCriteria,
    pub sort: Option<SortSpec>,
    pub dedupe: DedupeOrder,
}

impl Query {
    pub fn new(criteria: FilterCriteria) -> Self {
        Query {
            criteria,
            sort: None,
            dedupe: DedupeOrder::Never,
        }
    }

    pub fn sorted(mut self, spec: SortSpec) -> Self {
        self.sort = Some(spec);
        self
    }

    pub fn deduped(mut self, order: DedupeOrder) -> Self {
        self.dedupe = order;
        self
    }

    /// Filter, then sort and dedupe in the configured order.
    pub fn run<R: Record>(&self, records: &[R]) -> Vec<R> {
        let filtered = filter(records, &self.criteria);
        let ordered = |rows: Vec<R>| match &self.sort {
            Some(spec) => sort(&rows, spec),
            None => rows,
        };
        match self.dedupe {
            DedupeOrder::Never => ordered(filtered),
            DedupeOrder::BeforeSort => ordered(dedupe(&filtered)),
            DedupeOrder::AfterSort => dedupe(&ordered(filtered)),
        }
    }
}

/// Result of one pipeline run, ready for the table and chart consumers.
#[derive(Debug, Clone)]
pub struct View<R> {
    pub rows: Vec<R>,
    pub page_size: PageSize,
}

impl<R: Record> View<R> {
    pub fn build(records: &[R], query: &Query, page_size: PageSize) -> Self {
        View {
            rows: query.run(records),
            page_size,
        }
    }

    /// Page `page`, clamped into range.
    pub fn page(&self, page: usize) -> Page<'_, R> {
        let total = super::paginate::total_pages(self.rows.len(), self.page_size);
        paginate(&self.rows, clamp_page(page, total), self.page_size)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Criterion;
    use crate::data::model::ContentRecord;

    fn rated(title: &str, rating: f64) -> ContentRecord {
        let mut r = ContentRecord::new(title, title);
        r.rating = Some(rating);
        r
    }

    fn titles(records: &[ContentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn sort_then_dedupe_keeps_highest_ranked_duplicate() {
        let records = vec![rated("Dune 2", 8.5), rated("Dune", 8.5), rated("Elio", 6.0)];
        let query = Query::default().sorted(SortSpec::descending("rating"));
        assert_eq!(query.dedupe, DedupeOrder::AfterSort);
        assert_eq!(titles(&query.run(&records)), ["Dune 2", "Elio"]);
    }

    #[test]
    fn dedupe_order_decides_the_survivor() {
        let records = vec![rated("Elio", 6.0), rated("Dune", 7.0), rated("Dune 3", 9.0)];
        let spec = SortSpec::descending("rating");

        let after = Query::default().sorted(spec.clone()).deduped(DedupeOrder::AfterSort);
        assert_eq!(titles(&after.run(&records)), ["Dune 3", "Elio"]);

        let before = Query::default().sorted(spec.clone()).deduped(DedupeOrder::BeforeSort);
        assert_eq!(titles(&before.run(&records)), ["Dune", "Elio"]);

        let never = Query::default().sorted(spec).deduped(DedupeOrder::Never);
        assert_eq!(titles(&never.run(&records)), ["Dune 3", "Dune", "Elio"]);
    }

    #[test]
    fn view_pages_are_clamped() {
        let records: Vec<_> = (0..23).map(|i| rated(&format!("t{i:02}"), 5.0)).collect();
        let query = Query::new(FilterCriteria::new().with("rating", Criterion::Range { min: 1.0, max: 10.0 }));
        let view = View::build(&records, &query, PageSize::new(10).unwrap());
        assert_eq!(view.len(), 23);
        assert_eq!(view.page(99).page, 3);
        assert_eq!(view.page(99).items.len(), 3);
        assert_eq!(view.page(0).items[0].title, "t00");
    }
}
