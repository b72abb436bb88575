use crate::arr::{AddResponse, LibraryApi, LibraryItem, Tag};
use crate::error::{ArrError, ReconcileError};
use std::fmt;
use std::fmt::{Display, Formatter};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    TaggedExisting,
    AlreadyTagged,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created => write!(f, "added"),
            Outcome::TaggedExisting => write!(f, "tagged existing"),
            Outcome::AlreadyTagged => write!(f, "already tagged"),
        }
    }
}

type Defaults<A> = <<A as LibraryApi>::Item as LibraryItem>::Defaults;

fn find_tag(tags: &[Tag], label: &str) -> Option<i64> {
    tags.iter()
        .find(|t| t.label.eq_ignore_ascii_case(label))
        .map(|t| t.id)
}

/// Makes sure items exist in one library manager and carry the run's tag.
pub struct Reconciler<A: LibraryApi> {
    api: A,
    defaults: Defaults<A>,
}

impl<A: LibraryApi> Reconciler<A> {
    pub fn new(api: A, defaults: Defaults<A>) -> Self {
        Self { api, defaults }
    }

    /// Id of the tag labelled `label`, creating it when missing.
    ///
    /// Call once per run, before any [`Reconciler::add_or_tag`]. Two runs
    /// racing on the same label may both try to create it; a rejected create
    /// is settled by listing the tags again.
    pub fn ensure_tag(&self, label: &str) -> Result<i64, ReconcileError> {
        if let Some(id) = find_tag(&self.api.tags()?, label) {
            debug!(label, id, "using existing tag");
            return Ok(id);
        }

        match self.api.create_tag(label) {
            Ok(tag) => {
                info!(label, id = tag.id, "created tag");
                Ok(tag.id)
            }
            Err(err @ ArrError::Rejected { .. }) => {
                warn!(label, "tag creation rejected, checking whether it exists now");
                find_tag(&self.api.tags()?, label).ok_or(ReconcileError::Api(err))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn add_or_tag(&self, title: &str, target_id: i64, tag_id: i64) -> Result<Outcome, ReconcileError> {
        let item = A::Item::for_add(title, target_id, vec![tag_id], &self.defaults);
        if self.api.add(&item)? == AddResponse::Created {
            return Ok(Outcome::Created);
        }

        let mut existing = self
            .api
            .find(target_id)?
            .into_iter()
            .find(|i| i.target_id() == target_id)
            .ok_or(ReconcileError::Vanished { target_id })?;

        if existing.has_tag(tag_id) {
            return Ok(Outcome::AlreadyTagged);
        }

        let id = existing
            .id()
            .ok_or(ReconcileError::MissingId { target_id })?;
        existing.tags_mut().push(tag_id);
        self.api.update(id, &existing)?;
        Ok(Outcome::TaggedExisting)
    }
}
