//! Customer fixture shared by the HTTP tests

#![allow(dead_code)]

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use crud_rest::assembler::{Assembler, AssemblerError};
use crud_rest::handlers::{
    crud_router, read_router, CreateResource, DeleteResource, ReadResource, Resource,
    UpdateResource,
};
use crud_rest::memory::InMemoryRepository;
use crud_rest::aggregate::AggregateRoot;
use crud_rest::repository::FilterValue;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;

/// Customers are identified by first and last name, written `Robert SMITH`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerId {
    pub first_name: String,
    pub last_name: String,
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

impl FromStr for CustomerId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, last) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| format!("'{s}' is not '<first> <last>'"))?;
        let (first, last) = (first.trim(), last.trim());
        if first.is_empty() || last.is_empty() {
            return Err(format!("'{s}' is not '<first> <last>'"));
        }
        Ok(Self {
            first_name: first.to_string(),
            last_name: last.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub age: Option<i64>,
}

impl AggregateRoot for Customer {
    type Id = CustomerId;

    fn id(&self) -> &CustomerId {
        &self.id
    }

    fn attribute(&self, name: &str) -> Option<FilterValue> {
        match name {
            "firstName" => Some(self.id.first_name.as_str().into()),
            "lastName" => Some(self.id.last_name.as_str().into()),
            "age" => self.age.map(FilterValue::from),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRepresentation {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

pub struct CustomerAssembler;

impl Assembler<Customer, CustomerRepresentation> for CustomerAssembler {
    fn assemble(&self, customer: &Customer) -> CustomerRepresentation {
        CustomerRepresentation {
            first_name: customer.id.first_name.clone(),
            last_name: customer.id.last_name.clone(),
            age: customer.age,
        }
    }

    fn create_aggregate(
        &self,
        representation: CustomerRepresentation,
    ) -> Result<Customer, AssemblerError> {
        let mut customer = Customer {
            id: CustomerId {
                first_name: String::new(),
                last_name: String::new(),
            },
            age: None,
        };
        self.merge_aggregate(representation, &mut customer)?;
        Ok(customer)
    }

    fn merge_aggregate(
        &self,
        representation: CustomerRepresentation,
        customer: &mut Customer,
    ) -> Result<(), AssemblerError> {
        if representation.first_name.trim().is_empty() {
            return Err(AssemblerError::invalid("firstName", "must not be blank"));
        }
        if representation.last_name.trim().is_empty() {
            return Err(AssemblerError::invalid("lastName", "must not be blank"));
        }
        if representation.age.is_some_and(|age| age < 0) {
            return Err(AssemblerError::invalid("age", "must not be negative"));
        }
        customer.id = CustomerId {
            first_name: representation.first_name,
            last_name: representation.last_name,
        };
        customer.age = representation.age;
        Ok(())
    }
}

pub struct CustomerResource {
    repository: InMemoryRepository<Customer>,
    assembler: CustomerAssembler,
}

impl Resource for CustomerResource {
    type Aggregate = Customer;
    type Representation = CustomerRepresentation;
    type Repository = InMemoryRepository<Customer>;
    type Assembler = CustomerAssembler;

    fn repository(&self) -> &Self::Repository {
        &self.repository
    }

    fn assembler(&self) -> &Self::Assembler {
        &self.assembler
    }
}

impl ReadResource for CustomerResource {}
impl CreateResource for CustomerResource {}
impl UpdateResource for CustomerResource {}
impl DeleteResource for CustomerResource {}

pub fn customer(first_name: &str, last_name: &str, age: Option<i64>) -> Customer {
    Customer {
        id: CustomerId {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        },
        age,
    }
}

/// Jeanne, Michael and Robert, stored in first name order
pub fn seeded_resource() -> CustomerResource {
    CustomerResource {
        repository: InMemoryRepository::with_aggregates(vec![
            customer("Jeanne", "DUPONT", Some(34)),
            customer("Michael", "JORDAN", Some(61)),
            customer("Robert", "SMITH", None),
        ]),
        assembler: CustomerAssembler,
    }
}

/// Full CRUD router mounted at `/customers`
pub fn app() -> Router {
    Router::new().nest("/customers", crud_router(Arc::new(seeded_resource())))
}

/// Read-only router mounted at `/customers`
pub fn read_only_app() -> Router {
    Router::new().nest("/customers", read_router(Arc::new(seeded_resource())))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn first_names(items: &serde_json::Value) -> Vec<&str> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["firstName"].as_str().unwrap())
        .collect()
}
