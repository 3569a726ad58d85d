//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod auth_gate;
mod business_catalogue;
mod business_repository;
mod catalogue_command;
mod catalogue_query;
mod city_repository;
mod credential_hasher;
mod token_blacklist;
mod token_codec;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use auth_gate::MockAuthGate;
pub use auth_gate::AuthGate;
#[cfg(test)]
pub use business_catalogue::MockBusinessCatalogue;
pub use business_catalogue::BusinessCatalogue;
#[cfg(test)]
pub use business_repository::MockBusinessRepository;
pub use business_repository::{BusinessPage, BusinessRepository, BusinessRepositoryError};
#[cfg(test)]
pub use catalogue_command::MockCatalogueCommand;
pub use catalogue_command::{CatalogueCommand, ReviewAdded};
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::{CatalogueQuery, CityDetail, Listing};
#[cfg(test)]
pub use city_repository::MockCityRepository;
pub use city_repository::{CityPage, CityRepository, CityRepositoryError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use token_blacklist::MockTokenBlacklist;
pub use token_blacklist::{TokenBlacklist, TokenBlacklistError};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenCodecError};
