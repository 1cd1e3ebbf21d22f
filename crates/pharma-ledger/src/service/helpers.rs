//! # Pharma Contract Service - Helper Methods
//!
//! Record loading, input validation and the query fast path.

use super::*;
use std::collections::HashSet;

/// Parse a serialized array of ids, as the invocation glue passes them.
pub fn parse_id_list(json: &str) -> Result<Vec<String>, ContractError> {
    serde_json::from_str(json)
        .map_err(|e| ContractError::invalid_input(format!("unparseable id list: {}", e)))
}

impl PharmaContract {
    /// Load a record of any kind.
    pub(crate) fn load<S: LedgerStub>(
        &self,
        stub: &S,
        id: &str,
    ) -> Result<LedgerRecord, ContractError> {
        self.try_load(stub, id)?
            .ok_or_else(|| ContractError::item_not_found(id))
    }

    /// Load a record of any kind, `None` if the key is empty.
    pub(crate) fn try_load<S: LedgerStub>(
        &self,
        stub: &S,
        id: &str,
    ) -> Result<Option<LedgerRecord>, ContractError> {
        match stub.get_state(id)? {
            Some(bytes) => LedgerRecord::decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Load a record and narrow it to `T`.
    pub(crate) fn load_as<T: Record, S: LedgerStub>(
        &self,
        stub: &S,
        id: &str,
    ) -> Result<T, ContractError> {
        let record = self
            .try_load(stub, id)?
            .ok_or_else(|| ContractError::not_found(id, T::KIND))?;
        T::from_record(record).map_err(|other| ContractError::KindMismatch {
            id: id.to_string(),
            expected: T::KIND,
            actual: other.doc_type(),
        })
    }

    /// Fail `AlreadyExists` if any record uses `id`.
    ///
    /// Ids are unique across all kinds. Only current state is checked, so an
    /// id deleted by the host may be minted again.
    pub(crate) fn ensure_absent<S: LedgerStub>(
        &self,
        stub: &S,
        id: &str,
        kind: DocType,
    ) -> Result<(), ContractError> {
        if stub.get_state(id)?.is_some() {
            return Err(ContractError::AlreadyExists {
                id: id.to_string(),
                kind,
            });
        }
        Ok(())
    }

    pub(crate) fn store<S: LedgerStub>(
        &self,
        stub: &mut S,
        record: &LedgerRecord,
    ) -> Result<(), ContractError> {
        stub.put_state(record.id(), record.encode()?)?;
        Ok(())
    }

    /// Validate a child id list for a seal or an order.
    ///
    /// Reads inside a transaction do not see its own writes, so a repeated id
    /// would pass the assignment check twice. Duplicates are rejected here.
    pub(crate) fn validate_child_ids(&self, child_ids: &[String]) -> Result<(), ContractError> {
        if child_ids.is_empty() {
            return Err(ContractError::invalid_input("child id list is empty"));
        }
        if child_ids.len() > self.config.max_children_per_seal {
            return Err(ContractError::invalid_input(format!(
                "{} child ids exceed the limit of {}",
                child_ids.len(),
                self.config.max_children_per_seal
            )));
        }

        let mut seen = HashSet::with_capacity(child_ids.len());
        for id in child_ids {
            validate_id(id)?;
            if !seen.insert(id.as_str()) {
                return Err(ContractError::invalid_input(format!(
                    "child id {} is listed twice",
                    id
                )));
            }
        }
        Ok(())
    }

    /// Run a selector through the secondary index, falling back to the
    /// ledger when no index is attached, it is disabled, or it fails.
    pub(crate) fn select<S: LedgerStub>(
        &self,
        stub: &S,
        selector: &Selector,
    ) -> Result<Vec<(String, Vec<u8>)>, ContractError> {
        if let Some(index) = self.active_index() {
            match index.query(selector) {
                Ok(rows) => return Ok(rows),
                Err(e) => warn!(
                    error = %e,
                    query = %selector.to_couch_query(),
                    "Secondary index query failed, falling back to ledger"
                ),
            }
        }
        Ok(stub.query(selector)?)
    }

    /// Decoded records matching a selector.
    pub(crate) fn select_records<S: LedgerStub>(
        &self,
        stub: &S,
        selector: &Selector,
    ) -> Result<Vec<LedgerRecord>, ContractError> {
        self.select(stub, selector)?
            .iter()
            .map(|(_, bytes)| LedgerRecord::decode(bytes))
            .collect()
    }

    /// Records matching a selector, narrowed to `T`. Records of other kinds
    /// are dropped.
    pub(crate) fn select_as<T: Record, S: LedgerStub>(
        &self,
        stub: &S,
        selector: &Selector,
    ) -> Result<Vec<T>, ContractError> {
        Ok(self
            .select_records(stub, selector)?
            .into_iter()
            .filter_map(|record| T::from_record(record).ok())
            .collect())
    }

    pub(crate) fn active_index(&self) -> Option<&dyn SecondaryIndex> {
        if !self.config.use_secondary_index {
            return None;
        }
        self.index.as_deref()
    }
}

/// Reject empty ids.
pub(crate) fn validate_id(id: &str) -> Result<(), ContractError> {
    if id.trim().is_empty() {
        return Err(ContractError::invalid_input("id must not be empty"));
    }
    Ok(())
}
