//! Dispatching a single step against the data bag.
//!
//! `dispatch` is the one place step state and bag state meet:
//!
//! 1. every bag key matching a declared input slot is copied into the
//!    step's inputs (bag keys without a slot are invisible; slots without
//!    a bag key keep their previous value - no defaulting);
//! 2. the bound behavior runs against the populated inputs;
//! 3. the returned map is merged into the step's accumulated outputs;
//! 4. the whole accumulated output map is merged into the bag.
//!
//! Step outputs are never cleared, so values produced by an earlier
//! invocation flow back into the bag on a later one unless overwritten.

use crate::error::{FlowError, Result};
use crate::state::{self, DataBag};
use crate::step::Step;
use tracing::debug;

/// Run one step against the bag, merging produced outputs back in.
///
/// # Errors
///
/// - [`FlowError::MissingBehavior`] if the step has no bound behavior.
/// - [`FlowError::Behavior`] wrapping any error the behavior returns.
pub async fn dispatch(step: &mut Step, bag: &mut DataBag) -> Result<()> {
    let slots: Vec<String> = step.inputs.keys().cloned().collect();
    for key in slots {
        if let Some(value) = bag.get(&key) {
            step.inputs.insert(key, value.clone());
        }
    }

    let behavior = step
        .behavior()
        .ok_or_else(|| FlowError::missing_behavior(&step.id))?;

    debug!(step = %step.id, inputs = step.inputs.len(), "dispatching step");

    let produced = behavior
        .execute(&step.inputs)
        .await
        .map_err(|e| FlowError::behavior(&step.id, e.to_string()))?;

    state::merge(&mut step.outputs, &produced);
    state::merge(bag, &step.outputs);

    debug!(step = %step.id, outputs = step.outputs.len(), "step dispatched");
    Ok(())
}
