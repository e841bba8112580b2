//! Resource traits for REST CRUD exposure
//!
//! A resource binds one aggregate type to its repository and assembler.
//! Capabilities are opt-in: implement [`ReadResource`] for the GET endpoints,
//! and [`CreateResource`], [`UpdateResource`], [`DeleteResource`] for the
//! write endpoints. Every capability method has a default body, so an empty
//! `impl` block is enough.
//!
//! Async methods use RPITIT (Return Position Impl Trait In Traits) instead of
//! `async_trait`.
//!
//! # Example
//!
//! ```rust,ignore
//! use crud_rest::handlers::{ReadResource, Resource};
//! use crud_rest::memory::InMemoryRepository;
//!
//! struct CustomerResource {
//!     repository: InMemoryRepository<Customer>,
//!     assembler: CustomerAssembler,
//! }
//!
//! impl Resource for CustomerResource {
//!     type Aggregate = Customer;
//!     type Representation = CustomerRepresentation;
//!     type Repository = InMemoryRepository<Customer>;
//!     type Assembler = CustomerAssembler;
//!
//!     fn repository(&self) -> &Self::Repository {
//!         &self.repository
//!     }
//!
//!     fn assembler(&self) -> &Self::Assembler {
//!         &self.assembler
//!     }
//! }
//!
//! impl ReadResource for CustomerResource {}
//! ```

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::dispatch;
use super::error::{ApiError, ApiErrorKind, ApiOperation};
use super::response::ListResponse;
use crate::aggregate::{aggregate_name, AggregateRoot};
use crate::assembler::Assembler;
use crate::pagination::PaginationIntent;
use crate::repository::{Repository, SortOption};
use crate::specification::Specification;

/// Identifier type of a resource's aggregate
pub type ResourceId<R> = <<R as Resource>::Aggregate as AggregateRoot>::Id;

/// Base capability set shared by every resource
pub trait Resource: Sized + Send + Sync + 'static {
    /// Aggregate exposed by this resource
    type Aggregate: AggregateRoot;
    /// Wire representation of the aggregate
    type Representation: Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Storage for the aggregate
    type Repository: Repository<Self::Aggregate>;
    /// Mapping between aggregate and representation
    type Assembler: Assembler<Self::Aggregate, Self::Representation>;

    /// The repository
    fn repository(&self) -> &Self::Repository;

    /// The assembler
    fn assembler(&self) -> &Self::Assembler;

    /// Name used in messages, the aggregate's short type name by default
    fn aggregate_name(&self) -> &str {
        aggregate_name::<Self::Aggregate>()
    }

    /// Filter applied to every list request; matches everything by default
    fn filter_specification(&self) -> Specification<Self::Aggregate> {
        Specification::any()
    }
}

/// `GET /` and `GET /{id}`
pub trait ReadResource: Resource {
    /// List aggregates according to the pagination intent
    ///
    /// Unpaginated intents return a flat list, offset and attribute intents
    /// a slice, page intents a page.
    fn list(
        &self,
        intent: PaginationIntent,
        sort: SortOption,
    ) -> impl Future<Output = Result<ListResponse<Self::Representation>, ApiError>> + Send {
        async move {
            let spec = self.filter_specification();
            let listing = dispatch::list(self.repository(), &intent, &spec, &sort).await?;
            Ok(assemble_listing(self.assembler(), listing))
        }
    }

    /// Load and assemble one aggregate
    fn get(
        &self,
        id: ResourceId<Self>,
    ) -> impl Future<Output = Result<Self::Representation, ApiError>> + Send {
        async move {
            let aggregate = dispatch::get(self.repository(), &id, self.aggregate_name()).await?;
            Ok(self.assembler().assemble(&aggregate))
        }
    }
}

/// `POST /`
pub trait CreateResource: Resource {
    /// Build an aggregate from its representation and store it
    ///
    /// Returns the new identifier and the stored representation.
    fn create(
        &self,
        representation: Self::Representation,
    ) -> impl Future<Output = Result<(ResourceId<Self>, Self::Representation), ApiError>> + Send
    {
        async move {
            let aggregate = self
                .assembler()
                .create_aggregate(representation)
                .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Create))?;
            let id = aggregate.id().clone();
            let body = self.assembler().assemble(&aggregate);

            self.repository()
                .add(aggregate)
                .await
                .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Create))?;

            tracing::info!(aggregate = self.aggregate_name(), id = %id, "Aggregate created");
            Ok((id, body))
        }
    }
}

/// `PUT /{id}`
pub trait UpdateResource: Resource {
    /// Merge a representation into a stored aggregate
    ///
    /// The merge must not change the identifier.
    fn update(
        &self,
        id: ResourceId<Self>,
        representation: Self::Representation,
    ) -> impl Future<Output = Result<Self::Representation, ApiError>> + Send {
        async move {
            let mut aggregate = dispatch::get(self.repository(), &id, self.aggregate_name())
                .await
                .map_err(|e| e.with_operation(ApiOperation::Update))?;

            self.assembler()
                .merge_aggregate(representation, &mut aggregate)
                .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Update))?;

            if *aggregate.id() != id {
                return Err(ApiError::new(
                    ApiOperation::Update,
                    ApiErrorKind::InvalidParameter,
                    format!(
                        "Invalid parameter 'id': cannot change identifier from {} to {}",
                        id,
                        aggregate.id()
                    ),
                )
                .with_entity(self.aggregate_name(), id.to_string()));
            }

            let body = self.assembler().assemble(&aggregate);
            self.repository()
                .update(aggregate)
                .await
                .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Update))?;

            tracing::info!(aggregate = self.aggregate_name(), id = %id, "Aggregate updated");
            Ok(body)
        }
    }
}

/// `DELETE /{id}`
pub trait DeleteResource: Resource {
    /// Remove a stored aggregate
    fn delete(&self, id: ResourceId<Self>) -> impl Future<Output = Result<(), ApiError>> + Send {
        async move {
            let removed = self
                .repository()
                .remove(&id)
                .await
                .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Delete))?;

            if !removed {
                return Err(dispatch::not_found(self.aggregate_name(), &id)
                    .with_operation(ApiOperation::Delete));
            }

            tracing::info!(aggregate = self.aggregate_name(), id = %id, "Aggregate deleted");
            Ok(())
        }
    }
}

fn assemble_listing<A, D>(
    assembler: &impl Assembler<A, D>,
    listing: ListResponse<A>,
) -> ListResponse<D> {
    match listing {
        ListResponse::All(items) => ListResponse::All(assembler.assemble_all(&items)),
        ListResponse::Page(page) => ListResponse::Page(assembler.assemble_page(page)),
        ListResponse::Slice(slice) => ListResponse::Slice(assembler.assemble_slice(slice)),
    }
}
