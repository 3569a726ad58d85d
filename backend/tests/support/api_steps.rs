//! Assertion steps shared by the API behaviour suites.

use rstest_bdd_macros::then;
use serde_json::Value;

use crate::harness::WorldFixture;

#[then("the response status is {status}")]
fn the_response_status_is(world: &WorldFixture, status: u16) {
    let ctx = world.world();
    let ctx = ctx.borrow();
    assert_eq!(ctx.last_status, Some(status), "body: {:?}", ctx.last_body);
    assert!(ctx.last_trace_id.is_some(), "every response carries a trace id");
}

#[then("the error message is {message}")]
fn the_error_message_is(world: &WorldFixture, message: String) {
    let ctx = world.world();
    let ctx = ctx.borrow();
    assert_eq!(
        ctx.body().get("message").and_then(Value::as_str),
        Some(message.as_str())
    );
}
