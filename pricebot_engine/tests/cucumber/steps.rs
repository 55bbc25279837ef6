use cucumber::{then, when};
use pricebot_engine::hint::hint;

use crate::cucumber::ResolverWorld;

#[when(expr = "I resolve {string}")]
async fn resolve(world: &mut ResolverWorld, input: String) {
    world.resolve(input).await;
}

#[then(expr = "the result is item {int}")]
async fn result_is_item(world: &mut ResolverWorld, id: i64) {
    assert_eq!(world.result().id(), Some(id), "Unexpected match for '{}'", world.input);
}

#[then("the result is empty")]
async fn result_is_empty(world: &mut ResolverWorld) {
    assert!(world.result().is_empty(), "Expected no match for '{}', got {:?}", world.input, world.result());
}

#[then("the result is a guess")]
async fn result_is_guess(world: &mut ResolverWorld) {
    assert!(world.result().is_guess, "Expected a guess for '{}'", world.input);
}

#[then("the result is not a guess")]
async fn result_is_not_guess(world: &mut ResolverWorld) {
    assert!(!world.result().is_guess, "Did not expect a guess for '{}'", world.input);
}

#[then("the result was found by id")]
async fn result_by_id(world: &mut ResolverWorld) {
    assert!(world.result().is_numeric_id, "Expected '{}' to match by id", world.input);
}

#[then(regex = r"^the hint reads: (.*)$")]
async fn hint_is(world: &mut ResolverWorld, expected: String) {
    assert_eq!(hint(world.result(), &world.input), expected);
}

#[then("there is no hint")]
async fn no_hint(world: &mut ResolverWorld) {
    assert_eq!(hint(world.result(), &world.input), "");
}
