//! # Current-State Walk
//!
//! Follows stored parent and child pointers. Reflects only the latest
//! committed value of every key it touches.

use super::*;

impl PharmaContract {
    pub(crate) fn walk_current<S: LedgerStub>(
        &self,
        stub: &S,
        item_id: &str,
    ) -> Result<ScanResult, ContractError> {
        let item = self.load(stub, item_id)?;

        let ancestors = match &item {
            // An order has no parent. A shipment's order is not a
            // containment parent and is left out of this view.
            LedgerRecord::Order(_) | LedgerRecord::Shipment(_) => Vec::new(),
            LedgerRecord::Strip(_) | LedgerRecord::Box(_) | LedgerRecord::Carton(_) => {
                self.current_ancestors(stub, &item)?
            }
        };
        let descendants = self.current_children(stub, &item)?;

        debug!(
            item_id = %item_id,
            kind = %item.doc_type(),
            ancestors = ancestors.len(),
            descendants = descendants.len(),
            "Scanned item"
        );
        Ok(ScanResult {
            item_type: item.doc_type(),
            item,
            ancestors,
            descendants,
        })
    }

    /// Parents up to and including the shipment, nearest first. Stops at the
    /// first empty pointer or missing record. Only strictly larger kinds are
    /// followed.
    fn current_ancestors<S: LedgerStub>(
        &self,
        stub: &S,
        item: &LedgerRecord,
    ) -> Result<Vec<LedgerRecord>, ContractError> {
        let mut ancestors = Vec::new();
        let mut kind = item.doc_type();
        let mut cursor = item.parent_id().map(str::to_string);

        while let Some(parent_id) = cursor {
            let Some(parent) = self.try_load(stub, &parent_id)? else {
                break;
            };
            if parent.doc_type() <= kind || parent.doc_type() == DocType::Order {
                break;
            }
            kind = parent.doc_type();
            cursor = match &parent {
                LedgerRecord::Shipment(_) => None,
                _ => parent.parent_id().map(str::to_string),
            };
            ancestors.push(parent);
        }
        Ok(ancestors)
    }

    /// Direct children in sealing order. Missing children are skipped.
    fn current_children<S: LedgerStub>(
        &self,
        stub: &S,
        item: &LedgerRecord,
    ) -> Result<Vec<LedgerRecord>, ContractError> {
        let mut children = Vec::with_capacity(item.child_ids().len());
        for child_id in item.child_ids() {
            match self.try_load(stub, child_id)? {
                Some(child) => children.push(child),
                None => debug!(child_id = %child_id, "Skipping missing child"),
            }
        }
        Ok(children)
    }
}
