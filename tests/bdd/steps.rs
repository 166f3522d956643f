//! Step definitions for scenario execution behaviour.

use cucumber::{given, then, when};
use scenario::{ExecutionMode, Keyword};

use crate::world::ScenarioWorld;

fn keywords(list: &str) -> Vec<Keyword> {
    list.split(',')
        .map(|keyword| keyword.parse().expect("feature lists valid keywords"))
        .collect()
}

#[given(expr = "a(n) {word} scenario")]
fn a_scenario(world: &mut ScenarioWorld, mode: String) {
    world.mode = mode
        .parse::<ExecutionMode>()
        .expect("feature names a valid mode");
}

#[given(expr = "steps recorded as {string}")]
fn steps_recorded(world: &mut ScenarioWorld, list: String) { world.keywords = keywords(&list); }

#[given(expr = "the greeting {string} is attached")]
fn greeting_attached(world: &mut ScenarioWorld, greeting: String) {
    world.greeting = Some(greeting);
}

#[given("a step that reads the greeting")]
fn reads_greeting(world: &mut ScenarioWorld) { world.reads_greeting = true; }

#[given("a step that needs an unattached value")]
fn needs_unattached(world: &mut ScenarioWorld) { world.needs_unattached = true; }

#[when("the scenario runs")]
fn scenario_runs(world: &mut ScenarioWorld) { world.run_scenario(); }

#[then(expr = "the steps ran as {string}")]
fn steps_ran(world: &mut ScenarioWorld, list: String) {
    let expected: Vec<String> = keywords(&list).iter().map(ToString::to_string).collect();
    assert_eq!(world.invoked, expected);
}

#[then("every step was announced with its own keyword")]
fn announced(world: &mut ScenarioWorld) {
    assert_eq!(world.logs.len(), world.keywords.len());
    for (log, keyword) in world.logs.iter().zip(&world.keywords) {
        assert!(
            log.starts_with(&format!("{keyword} ")),
            "{log:?} should start with {keyword}"
        );
    }
}

#[then(expr = "the step read {string}")]
fn step_read(world: &mut ScenarioWorld, greeting: String) {
    assert!(world.failure.is_none(), "unexpected failure: {:?}", world.failure);
    assert_eq!(world.invoked, [greeting]);
}

#[then(expr = "the scenario aborts naming {string}")]
fn scenario_aborts(world: &mut ScenarioWorld, type_name: String) {
    let failure = world.failure.as_deref().expect("scenario should abort");
    assert!(failure.contains(&type_name), "failure: {failure}");
}
