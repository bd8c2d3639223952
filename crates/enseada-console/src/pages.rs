//! Headless page controllers.
//!
//! Each controller owns the state a list, detail or create view renders and
//! the operations the view triggers. When a controller has a required
//! permission, it is checked through the caller's `Guard` before any request:
//! reads require the configured permission, deletions require `delete` on the
//! same object. A denied check returns `Forbidden` and sends nothing.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use enseada_client::Service;
use enseada_contracts::{
    error::EnseadaResult,
    page::{page_to_offset, Page, PageParams, DEFAULT_LIMIT},
    permission::Permission,
};
use enseada_core::{traits::Authorizer, Guard};

/// Maps an item to the id used in its URL.
pub type IdFn<T> = fn(&T) -> String;

fn require<A: Authorizer + ?Sized>(guard: &Guard<'_, A>, permission: Option<&Permission>) -> EnseadaResult<()> {
    match permission {
        Some(p) => guard.require(p),
        None => Ok(()),
    }
}

fn delete_permission(permission: Option<&Permission>) -> Option<Permission> {
    permission.map(|p| Permission::new(p.object.clone(), "delete"))
}

// ── List ──────────────────────────────────────────────────────────────────────

pub struct ListPage<T> {
    name: String,
    service: Service<T>,
    map_id: IdFn<T>,
    permission: Option<Permission>,
    limit: usize,
    loading: bool,
    page: Page<T>,
    checked: Vec<T>,
}

impl<T: DeserializeOwned> ListPage<T> {
    pub fn new(name: impl Into<String>, service: Service<T>, map_id: IdFn<T>) -> Self {
        Self {
            name: name.into(),
            service,
            map_id,
            permission: None,
            limit: DEFAULT_LIMIT,
            loading: false,
            page: Page::default(),
            checked: Vec::new(),
        }
    }

    /// Permission required to view the list.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Check the view permission, then fetch the first page.
    pub async fn load<A: Authorizer + ?Sized>(&mut self, guard: &Guard<'_, A>) -> EnseadaResult<()> {
        self.load_at(guard, 1).await
    }

    /// Check the view permission, then fetch the 1-based `page` directly.
    pub async fn load_at<A: Authorizer + ?Sized>(
        &mut self,
        guard: &Guard<'_, A>,
        page: usize,
    ) -> EnseadaResult<()> {
        require(guard, self.permission.as_ref())?;
        self.on_page_change(page).await
    }

    pub async fn fetch(&mut self, offset: usize) -> EnseadaResult<()> {
        self.loading = true;
        let result = self.service.list(PageParams::new(self.limit, offset)).await;
        self.loading = false;
        self.page = result?;
        debug!(list = %self.name, offset, count = self.page.count, "page fetched");
        Ok(())
    }

    pub async fn reload_current(&mut self) -> EnseadaResult<()> {
        self.fetch(self.page.offset).await
    }

    /// Jump to a 1-based page number.
    pub async fn on_page_change(&mut self, page: usize) -> EnseadaResult<()> {
        self.fetch(page_to_offset(page, self.limit)).await
    }

    pub fn set_checked(&mut self, checked: Vec<T>) {
        self.checked = checked;
    }

    pub fn checked(&self) -> &[T] {
        &self.checked
    }

    /// Delete every checked item, then refetch the current page.
    ///
    /// Returns the ids that were deleted. Stops at the first failing
    /// deletion; items deleted before it stay deleted.
    pub async fn remove_checked<A: Authorizer + ?Sized>(
        &mut self,
        guard: &Guard<'_, A>,
    ) -> EnseadaResult<Vec<String>> {
        require(guard, delete_permission(self.permission.as_ref()).as_ref())?;

        let ids: Vec<String> = self.checked.iter().map(self.map_id).collect();
        for id in &ids {
            self.service.remove(id).await?;
            info!(list = %self.name, id = %id, "deleted");
        }
        self.checked.clear();
        self.reload_current().await?;
        Ok(ids)
    }

    pub fn id_of(&self, item: &T) -> String {
        (self.map_id)(item)
    }

    pub fn page(&self) -> &Page<T> {
        &self.page
    }

    pub fn items(&self) -> &[T] {
        &self.page.items
    }

    pub fn count(&self) -> usize {
        self.page.count
    }

    pub fn offset(&self) -> usize {
        self.page.offset
    }

    pub fn total(&self) -> usize {
        self.page.total
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

// ── Show ──────────────────────────────────────────────────────────────────────

pub struct ShowPage<T> {
    name: String,
    service: Service<T>,
    id: String,
    permission: Option<Permission>,
    loading: bool,
    model: Option<T>,
}

impl<T: DeserializeOwned> ShowPage<T> {
    pub fn new(name: impl Into<String>, service: Service<T>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service,
            id: id.into(),
            permission: None,
            loading: false,
            model: None,
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub async fn load<A: Authorizer + ?Sized>(&mut self, guard: &Guard<'_, A>) -> EnseadaResult<()> {
        require(guard, self.permission.as_ref())?;
        self.loading = true;
        let result = self.service.get(&self.id).await;
        self.loading = false;
        self.model = Some(result?);
        Ok(())
    }

    pub async fn remove<A: Authorizer + ?Sized>(&mut self, guard: &Guard<'_, A>) -> EnseadaResult<()> {
        require(guard, delete_permission(self.permission.as_ref()).as_ref())?;
        self.service.remove(&self.id).await?;
        info!(page = %self.name, id = %self.id, "deleted");
        self.model = None;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> Option<&T> {
        self.model.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

// ── Create ────────────────────────────────────────────────────────────────────

pub struct CreateForm<T> {
    name: String,
    service: Service<T>,
    map_id: IdFn<T>,
    permission: Option<Permission>,
    loading: bool,
    created: Option<T>,
}

impl<T: DeserializeOwned> CreateForm<T> {
    pub fn new(name: impl Into<String>, service: Service<T>, map_id: IdFn<T>) -> Self {
        Self {
            name: name.into(),
            service,
            map_id,
            permission: None,
            loading: false,
            created: None,
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Create the item and return its id.
    pub async fn submit<A, P>(&mut self, guard: &Guard<'_, A>, payload: &P) -> EnseadaResult<String>
    where
        A: Authorizer + ?Sized,
        P: Serialize + ?Sized,
    {
        require(guard, self.permission.as_ref())?;
        self.loading = true;
        let result = self.service.create(payload).await;
        self.loading = false;

        let created = result?;
        let id = (self.map_id)(&created);
        info!(form = %self.name, id = %id, "created");
        self.created = Some(created);
        Ok(id)
    }

    pub fn created(&self) -> Option<&T> {
        self.created.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
