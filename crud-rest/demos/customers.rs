//! Customer collection served over HTTP
//!
//! Run with:
//!
//! ```bash
//! cargo run --example customers
//! CRUD_SERVICE__PORT=9000 CRUD_RESOURCE__BASE_PATH=/api cargo run --example customers
//! ```
//!
//! Then try:
//!
//! ```bash
//! curl 'localhost:8080/customers?page=1&limit=2'
//! curl 'localhost:8080/customers?offset=1&limit=2&sort=-age'
//! curl 'localhost:8080/customers?attribute=firstName&value=Robert'
//! curl 'localhost:8080/customers/Robert%20SMITH'
//! curl -X POST localhost:8080/customers -H 'content-type: application/json' \
//!      -d '{"firstName":"Tara","lastName":"JOHNSON","age":28}'
//! curl -X DELETE 'localhost:8080/customers/Tara%20JOHNSON'
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crud_rest::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CustomerId {
    first_name: String,
    last_name: String,
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

impl FromStr for CustomerId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().split_once(' ') {
            Some((first, last)) if !first.trim().is_empty() && !last.trim().is_empty() => {
                Ok(Self {
                    first_name: first.trim().to_string(),
                    last_name: last.trim().to_string(),
                })
            }
            _ => Err(format!("expected '<first> <last>', got '{s}'")),
        }
    }
}

#[derive(Debug, Clone)]
struct Customer {
    id: CustomerId,
    age: Option<i64>,
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

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerRepresentation {
    first_name: String,
    last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    age: Option<i64>,
}

struct CustomerAssembler;

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
    ) -> std::result::Result<Customer, AssemblerError> {
        let id = CustomerId::from_str(&format!(
            "{} {}",
            representation.first_name, representation.last_name
        ))
        .map_err(|reason| AssemblerError::invalid("firstName", reason))?;
        Ok(Customer {
            id,
            age: representation.age,
        })
    }

    fn merge_aggregate(
        &self,
        representation: CustomerRepresentation,
        customer: &mut Customer,
    ) -> std::result::Result<(), AssemblerError> {
        *customer = self.create_aggregate(representation)?;
        Ok(())
    }
}

struct Customers {
    repository: InMemoryRepository<Customer>,
    assembler: CustomerAssembler,
}

impl Resource for Customers {
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

impl ReadResource for Customers {}
impl CreateResource for Customers {}
impl UpdateResource for Customers {}
impl DeleteResource for Customers {}

fn seed() -> Vec<Customer> {
    [
        ("Jeanne", "DUPONT", Some(34)),
        ("Michael", "JORDAN", Some(61)),
        ("Robert", "SMITH", None),
    ]
    .into_iter()
    .map(|(first, last, age)| Customer {
        id: CustomerId {
            first_name: first.to_string(),
            last_name: last.to_string(),
        },
        age,
    })
    .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_for_service("customers")?;
    init_tracing(&config)?;

    let customers = Customers {
        repository: InMemoryRepository::with_aggregates(seed())
            .with_default_page_size(config.pagination.default_page_size),
        assembler: CustomerAssembler,
    };

    let path = config.resource.path_for("customers");
    tracing::info!("Serving customers at {}", path);

    let app = Router::new().nest(&path, crud_router(Arc::new(customers)));

    Server::new(config).serve(app).await
}
