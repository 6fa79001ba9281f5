//! The query seam between the search controller and the data source.

use std::future::Future;
use std::sync::Arc;

use foodmap_core::{Coordinate, ProviderRecord, StatusSet};

use crate::error::RequestError;

/// Four stateless queries against the food-provider data source.
///
/// Each call is one network round trip. An empty `statuses` set means
/// "no restriction"; callers decide whether to substitute a default.
pub trait QueryGateway: Send + Sync {
    fn find_by_name(
        &self,
        query: &str,
        statuses: &StatusSet,
    ) -> impl Future<Output = Result<Vec<ProviderRecord>, RequestError>> + Send;

    /// Street search takes no status filter.
    fn find_by_street(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<ProviderRecord>, RequestError>> + Send;

    /// Nearest providers to `origin`, ascending by distance, at most `limit`.
    fn find_closest(
        &self,
        origin: Coordinate,
        limit: u32,
        statuses: &StatusSet,
    ) -> impl Future<Output = Result<Vec<ProviderRecord>, RequestError>> + Send;

    fn find_by_status(
        &self,
        statuses: &StatusSet,
    ) -> impl Future<Output = Result<Vec<ProviderRecord>, RequestError>> + Send;
}

impl<G: QueryGateway> QueryGateway for Arc<G> {
    fn find_by_name(
        &self,
        query: &str,
        statuses: &StatusSet,
    ) -> impl Future<Output = Result<Vec<ProviderRecord>, RequestError>> + Send {
        (**self).find_by_name(query, statuses)
    }

    fn find_by_street(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<ProviderRecord>, RequestError>> + Send {
        (**self).find_by_street(query)
    }

    fn find_closest(
        &self,
        origin: Coordinate,
        limit: u32,
        statuses: &StatusSet,
    ) -> impl Future<Output = Result<Vec<ProviderRecord>, RequestError>> + Send {
        (**self).find_closest(origin, limit, statuses)
    }

    fn find_by_status(
        &self,
        statuses: &StatusSet,
    ) -> impl Future<Output = Result<Vec<ProviderRecord>, RequestError>> + Send {
        (**self).find_by_status(statuses)
    }
}
