//! Generic CRUD service over one REST collection.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use enseada_contracts::{
    error::{EnseadaError, EnseadaResult},
    page::{Page, PageParams},
};

use crate::http::{decode, HttpClient};

/// Placeholder substituted with the parent id in association templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// CRUD operations on the collection at `path`.
///
/// Associations are nested collections keyed by kind, declared as path
/// templates containing `{id}`, e.g. `permissions` →
/// `/api/v1beta1/users/{id}/permissions`.
pub struct Service<T> {
    path: String,
    http: HttpClient,
    associations: HashMap<String, String>,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for Service<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            http: self.http.clone(),
            associations: self.associations.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Service<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("path", &self.path)
            .field("associations", &self.associations)
            .finish()
    }
}

impl<T: DeserializeOwned> Service<T> {
    pub fn new(path: impl Into<String>, http: HttpClient) -> Self {
        Self {
            path: path.into(),
            http,
            associations: HashMap::new(),
            _item: PhantomData,
        }
    }

    /// Declare a nested collection reachable through [`Self::association`].
    pub fn with_association(mut self, kind: impl Into<String>, template: impl Into<String>) -> Self {
        self.associations.insert(kind.into(), template.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }

    pub async fn list(&self, params: PageParams) -> EnseadaResult<Page<T>> {
        let res = self.http.get(&self.path, &params.to_query()).await?;
        decode(res).await
    }

    pub async fn get(&self, id: &str) -> EnseadaResult<T> {
        let res = self.http.get(&self.item_path(id), &[]).await?;
        decode(res).await
    }

    /// `HEAD path/id`; a 404 means the item does not exist.
    pub async fn exists(&self, id: &str) -> EnseadaResult<bool> {
        match self.http.head(&self.item_path(id)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_status(404) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn create<P: Serialize + ?Sized>(&self, payload: &P) -> EnseadaResult<T> {
        let res = self.http.post(&self.path, Some(payload)).await?;
        decode(res).await
    }

    /// `PUT path/id` with an optional body, for idempotent "attach" endpoints
    /// such as `users/{name}/roles/{role}`.
    pub async fn touch<P: Serialize + ?Sized>(&self, id: &str, payload: Option<&P>) -> EnseadaResult<T> {
        let res = self.http.put(&self.item_path(id), payload).await?;
        decode(res).await
    }

    pub async fn update<P: Serialize + ?Sized>(&self, id: &str, payload: &P) -> EnseadaResult<T> {
        let res = self.http.put(&self.item_path(id), Some(payload)).await?;
        decode(res).await
    }

    /// `DELETE path/id`.
    pub async fn remove(&self, id: &str) -> EnseadaResult<()> {
        self.http.delete::<()>(&self.item_path(id), None).await?;
        Ok(())
    }

    /// `DELETE path` with a JSON body, for collections addressed by value
    /// (e.g. removing a permission).
    pub async fn remove_payload<P: Serialize + ?Sized>(&self, payload: &P) -> EnseadaResult<()> {
        self.http.delete(&self.path, Some(payload)).await?;
        Ok(())
    }

    /// The nested collection `kind` of item `id`.
    pub fn association<A: DeserializeOwned>(&self, kind: &str, id: &str) -> EnseadaResult<Service<A>> {
        let template = self
            .associations
            .get(kind)
            .ok_or_else(|| EnseadaError::UnknownAssociation {
                path: self.path.clone(),
                kind: kind.to_string(),
            })?;
        Ok(Service::new(template.replace(ID_PLACEHOLDER, id), self.http.clone()))
    }
}
