mod resolver_world;
mod setups;
mod steps;

pub use resolver_world::ResolverWorld;
