//! Ownership-scoped access to stored resources
//!
//! Every read, update and delete of an owned resource goes through [`OwnershipGuard`].
//! A resource owned by someone else is reported exactly like a missing one, so callers
//! cannot probe for the existence of other users' records.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::auth::gate::{Identity, RequestContext};
use crate::error::{FocusFlowError, Result};
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::traits::ResourceStore;
use crate::tasks::model::OwnedResource;

pub struct OwnershipGuard<R, S: ?Sized> {
    store: Arc<S>,
    kind: &'static str,
    _resource: PhantomData<fn() -> R>,
}

impl<R, S> OwnershipGuard<R, S>
where
    R: OwnedResource,
    S: ResourceStore<R> + ?Sized,
{
    /// `kind` names the resource in security logs, e.g. `"task"`
    pub fn new(store: Arc<S>, kind: &'static str) -> Self {
        Self {
            store,
            kind,
            _resource: PhantomData,
        }
    }

    /// Fetch resource `id` on behalf of `identity`.
    ///
    /// Fails with `NotFoundOrForbidden` when the resource is absent or owned by another
    /// identity.
    pub async fn authorize(&self, identity: Identity, id: i64) -> Result<R> {
        let resource = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(FocusFlowError::NotFoundOrForbidden)?;

        if resource.owner_id() != identity.user_id() {
            log_security_event(&SecurityEvent::OwnershipMismatch {
                user_id: identity.user_id(),
                resource: format!("{}:{}", self.kind, id),
            });
            return Err(FocusFlowError::NotFoundOrForbidden);
        }

        Ok(resource)
    }

    /// Same as [`OwnershipGuard::authorize`], starting from the request context.
    ///
    /// A context without a numeric identity fails with `Unauthenticated` before any lookup.
    pub async fn authorize_request(&self, ctx: &RequestContext, id: i64) -> Result<R> {
        let identity = ctx.require_identity()?;
        self.authorize(identity, id).await
    }
}
