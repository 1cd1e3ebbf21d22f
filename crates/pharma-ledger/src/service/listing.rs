//! # Listing Helpers
//!
//! Availability filters, per-kind listings, statistics and id search.
//! All of them go through the secondary index fast path when one is active.

use super::*;

impl PharmaContract {
    /// Records of kind `T` whose owning-parent field is empty.
    pub(crate) fn unassigned<T: Record, S: LedgerStub>(
        &self,
        stub: &S,
        parent_field: &str,
    ) -> Result<Vec<T>, ContractError> {
        let selector = Selector::doc_type(T::KIND).eq(parent_field, "");
        let items: Vec<T> = self.select_as(stub, &selector)?;
        debug!(kind = %T::KIND, count = items.len(), "Listed unassigned items");
        Ok(items)
    }

    pub(crate) fn count_kind<S: LedgerStub>(
        &self,
        stub: &S,
        kind: DocType,
    ) -> Result<usize, ContractError> {
        if let Some(index) = self.active_index() {
            match index.count(kind) {
                Ok(count) => return Ok(count),
                Err(e) => warn!(
                    error = %e,
                    kind = %kind,
                    "Secondary index count failed, falling back to ledger"
                ),
            }
        }
        Ok(stub.query(&Selector::doc_type(kind))?.len())
    }

    pub(crate) fn collect_statistics<S: LedgerStub>(
        &self,
        stub: &S,
    ) -> Result<Statistics, ContractError> {
        let mut stats = Statistics::default();
        for kind in DocType::ALL {
            stats.set(kind, self.count_kind(stub, kind)?);
        }
        debug!(total = stats.total(), "Collected statistics");
        Ok(stats)
    }

    pub(crate) fn search_ids<S: LedgerStub>(
        &self,
        stub: &S,
        term: &str,
    ) -> Result<Vec<LedgerRecord>, ContractError> {
        let needle = term.to_lowercase();
        let mut results = Vec::new();
        for kind in DocType::ALL {
            results.extend(
                self.select_records(stub, &Selector::doc_type(kind))?
                    .into_iter()
                    .filter(|record| record.id().to_lowercase().contains(&needle)),
            );
        }
        debug!(term = %term, matches = results.len(), "Searched items");
        Ok(results)
    }
}
