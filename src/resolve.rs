use crate::error::ResolveError;
use crate::mapping::MappingSource;
use crate::media::{MediaKind, ResolvedRef};
use crate::store::IdentifierStore;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct KindResolution {
    /// Resolved entries in input order, unique by title key.
    pub resolved: Vec<ResolvedRef>,
    /// Report lines for entries with no target id anywhere.
    pub unresolved: Vec<String>,
}

impl KindResolution {
    // Same key twice: the later entry replaces the earlier one in place.
    fn insert(&mut self, resolved: ResolvedRef) {
        match self.resolved.iter_mut().find(|r| r.title == resolved.title) {
            Some(existing) => *existing = resolved,
            None => self.resolved.push(resolved),
        }
    }

    fn report(&mut self, line: String) {
        if !self.unresolved.contains(&line) {
            self.unresolved.push(line);
        }
    }

    #[cfg(test)]
    fn target_id(&self, title: &str) -> Option<i64> {
        self.resolved
            .iter()
            .find(|r| r.title == title)
            .map(|r| r.target_id)
    }
}

/// Resolves mal ids to target ids: local store first, community table for
/// whatever the store is missing.
pub struct Resolver<'a, M: MappingSource> {
    store: &'a IdentifierStore,
    mappings: &'a M,
}

impl<'a, M: MappingSource> Resolver<'a, M> {
    pub fn new(store: &'a IdentifierStore, mappings: &'a M) -> Self {
        Self { store, mappings }
    }

    pub fn resolve(
        &self,
        ids_by_kind: &BTreeMap<MediaKind, Vec<i64>>,
    ) -> Result<BTreeMap<MediaKind, KindResolution>, ResolveError> {
        let mut resolutions = BTreeMap::new();
        for (&kind, ids) in ids_by_kind {
            resolutions.insert(kind, self.resolve_kind(kind, ids)?);
        }
        Ok(resolutions)
    }

    pub fn resolve_kind(&self, kind: MediaKind, ids: &[i64]) -> Result<KindResolution, ResolveError> {
        let lookup = self.store.resolve_batch(ids, kind)?;

        let table = if lookup.pending() > 0 {
            debug!(%kind, pending = lookup.pending(), "consulting community mapping");
            Some(
                self.mappings
                    .load(kind)
                    .map_err(|source| ResolveError::Fallback { kind, source })?,
            )
        } else {
            None
        };

        let mut resolution = KindResolution::default();
        for (external, stored) in &lookup.entries {
            let target_id =
                (*stored).or_else(|| table.as_ref().and_then(|t| t.lookup(external.id)));
            match target_id {
                Some(target_id) => resolution.insert(ResolvedRef::new(external, target_id)),
                None => resolution.report(external.unresolved_report()),
            }
        }

        info!(
            %kind,
            resolved = resolution.resolved.len(),
            unresolved = resolution.unresolved.len(),
            "resolved {} ids",
            kind.catalog()
        );
        Ok(resolution)
    }
}
