use crate::params::QueryParams;

/// Source and sink of the current location's query parameters.
///
/// The DAG view reads filters from here and writes every filter change
/// back. Writing must replace the whole parameter set in one step.
pub trait QueryParamStore {
    fn search_params(&self) -> &QueryParams;

    /// Replace the current parameters. Returns `false` when nothing changed.
    fn set_search_params(&mut self, params: QueryParams) -> bool;
}

/// Browser-style location history.
///
/// Navigating pushes a new entry and drops anything ahead of the cursor.
/// Navigating to the parameters already current is a no-op, so repeated
/// clicks on the same control do not grow the history.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: Vec<QueryParams>,
    cursor: usize,
    limit: usize,
}

impl NavigationHistory {
    pub fn new(initial: QueryParams, limit: usize) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> &QueryParams {
        &self.entries[self.cursor]
    }

    pub fn navigate(&mut self, params: QueryParams) -> bool {
        if *self.current() == params {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(params);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        tracing::debug!(location = %self.current(), depth = self.depth(), "navigate");
        true
    }

    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Number of stored entries; never zero.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

impl QueryParamStore for NavigationHistory {
    fn search_params(&self) -> &QueryParams {
        self.current()
    }

    fn set_search_params(&mut self, params: QueryParams) -> bool {
        self.navigate(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> QueryParams {
        QueryParams::parse(s)
    }

    #[test]
    fn same_params_do_not_push() {
        let mut h = NavigationHistory::new(q("a=1"), 10);
        assert!(!h.navigate(q("a=1")));
        assert_eq!(h.depth(), 1);
    }

    #[test]
    fn navigate_drops_forward_entries() {
        let mut h = NavigationHistory::new(q(""), 10);
        h.navigate(q("a=1"));
        h.navigate(q("a=2"));
        assert!(h.back());
        assert_eq!(h.current(), &q("a=1"));
        h.navigate(q("a=3"));
        assert!(!h.forward());
        assert_eq!(h.depth(), 3);
        assert_eq!(h.current(), &q("a=3"));
    }

    #[test]
    fn back_and_forward_stop_at_the_ends() {
        let mut h = NavigationHistory::new(q(""), 10);
        assert!(!h.back());
        h.navigate(q("a=1"));
        assert!(h.back());
        assert_eq!(h.current(), &q(""));
        assert!(h.forward());
        assert!(!h.forward());
        assert_eq!(h.current(), &q("a=1"));
    }

    #[test]
    fn limit_evicts_oldest() {
        let mut h = NavigationHistory::new(q("n=0"), 3);
        for n in 1..=5 {
            h.navigate(q(&format!("n={n}")));
        }
        assert_eq!(h.depth(), 3);
        while h.back() {}
        assert_eq!(h.current(), &q("n=3"));
    }
}
