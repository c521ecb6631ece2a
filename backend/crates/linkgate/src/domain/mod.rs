//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (AuthChallenge)
//! - Domain value objects (Username, ChallengeToken, DeliveryCredentials, ...)
//! - Domain services (membership, record parsing, link building)
//! - Port traits (interfaces to the directory, stores, and remote services)

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
