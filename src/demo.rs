// Demo mode: a scripted session against the recording host
//
// Builds a few views the way a bot would, then feeds the router a fixed
// sequence of interactions and reports what happened at each step together
// with every host call that was made.
//
// Steps demonstrated:
// - Prefixed custom ids and a one-shot confirm view (DisableItems)
// - An unauthorized click being turned away
// - A multi-select with a MinAndMax trigger and per-option callbacks,
//   one of which fails and is logged without stopping the others
// - A modal opened from a button, submitted, and closing its parent view
// - An interaction nobody owns
//
// Run with: viewgen demo

use crate::components::{Button, Select, SelectOption, SelectTrigger, TextInput};
use crate::config::Config;
use crate::dispatch::{Callback, ComponentContext, ModalContext, Outcome, Router};
use crate::events::{InteractionEvent, SubmittedField, User};
use crate::host::recording::{HostCall, RecordingHost};
use crate::host::{ButtonStyle, TextStyle};
use crate::view::{Modal, UsedBehavior, View};
use std::time::Duration;
use tokio::time::sleep;

/// Outcome of one scripted interaction
#[derive(Debug, Clone)]
pub struct DemoStep {
    pub label: &'static str,
    pub outcome: Outcome,
}

/// Everything the demo produced
#[derive(Debug, Clone, Default)]
pub struct DemoReport {
    pub steps: Vec<DemoStep>,
    pub host_calls: Vec<HostCall>,
}

/// Run the scripted session
pub async fn run_demo(config: &Config) -> anyhow::Result<DemoReport> {
    let host = RecordingHost::new();
    let router = Router::new();
    let owner = User::new(config.demo.user_id, config.demo.user_name.clone());
    let intruder = User::new(config.demo.user_id + 1, "intruder");
    let delay = Duration::from_millis(config.demo.step_delay_ms);
    let defaults = config.views.to_defaults();

    let mut report = DemoReport::default();
    let mut step = |label: &'static str, outcome: Outcome| {
        tracing::info!("demo step '{}': {:?}", label, outcome);
        report.steps.push(DemoStep { label, outcome });
    };

    // 1. One-shot confirm view
    let mut confirm = View::with_defaults(&defaults);
    confirm
        .set_prefix("order42", true)
        .set_author(owner.clone(), true)
        .set_only_one_response(true)
        .set_used_behavior(UsedBehavior::DisableItems);
    confirm.add_components([
        Button::new("Confirm")
            .set_style(ButtonStyle::Success)
            .on_click(Callback::sync(|ctx: ComponentContext| {
                tracing::info!("order confirmed by {}", ctx.event.user.name);
                Ok(())
            })),
        Button::link("Terms", "https://example.com/terms"),
    ])?;
    let confirm = router.publish(confirm, &host, "Confirm order #42?").await?;
    let confirm_msg = confirm.lock().await.message_id();

    sleep(delay).await;
    step(
        "intruder clicks Confirm",
        router
            .dispatch(from_message(
                InteractionEvent::click(intruder.clone(), "order42-0"),
                confirm_msg,
            ))
            .await,
    );
    sleep(delay).await;
    step(
        "owner clicks Confirm",
        router
            .dispatch(from_message(
                InteractionEvent::click(owner.clone(), "order42-0"),
                confirm_msg,
            ))
            .await,
    );

    // 2. Pick-two select
    let mut toppings = View::with_defaults(&defaults);
    toppings.add_component(
        Select::new()
            .set_custom_id("toppings")
            .set_placeholder("Pick two toppings")
            .set_min_values(2)
            .set_max_values(2)
            .set_trigger(SelectTrigger::MinAndMax)
            .add_options([
                SelectOption::new("Cheese").set_value("cheese"),
                SelectOption::new("Olives")
                    .set_value("olives")
                    .on_select(Callback::sync(|_| anyhow::bail!("olives are out of stock"))),
                SelectOption::new("Basil")
                    .set_value("basil")
                    .on_select(Callback::sync(|_| {
                        tracing::info!("basil chosen last");
                        Ok(())
                    })),
            ])
            .on_select(Callback::new(report_toppings)),
    )?;
    // The configured prefix, if any, applies to these ids
    let toppings_id = toppings.custom_ids()[0].to_string();
    router.publish(toppings, &host, "Toppings").await?;

    sleep(delay).await;
    step(
        "owner picks one topping",
        router
            .dispatch(InteractionEvent::select(owner.clone(), &toppings_id, ["cheese"]))
            .await,
    );
    sleep(delay).await;
    step(
        "owner picks two toppings",
        router
            .dispatch(InteractionEvent::select(
                owner.clone(),
                &toppings_id,
                ["cheese", "olives"],
            ))
            .await,
    );
    sleep(delay).await;
    step(
        "owner re-picks ending with basil",
        router
            .dispatch(InteractionEvent::select(
                owner.clone(),
                &toppings_id,
                ["cheese", "basil"],
            ))
            .await,
    );

    // 3. Feedback modal
    let mut feedback = View::with_defaults(&defaults);
    feedback.add_component(
        Button::new("Leave feedback")
            .set_custom_id("feedback")
            .set_style(ButtonStyle::Secondary)
            .on_click(Callback::new(open_feedback_form)),
    )?;
    let feedback_id = feedback.custom_ids()[0].to_string();
    router.publish(feedback, &host, "How did we do?").await?;

    sleep(delay).await;
    step(
        "owner opens the feedback form",
        router
            .dispatch(
                InteractionEvent::click(owner.clone(), &feedback_id)
                    .with_responder(host.interaction()),
            )
            .await,
    );
    sleep(delay).await;
    step(
        "owner submits the form",
        router
            .dispatch(InteractionEvent::submit(
                owner.clone(),
                "feedback-form",
                vec![
                    SubmittedField::new("0", "5"),
                    SubmittedField::new("1", "Fast delivery"),
                ],
            ))
            .await,
    );

    // 4. Nobody owns this one
    sleep(delay).await;
    step(
        "click on a stale message",
        router
            .dispatch(InteractionEvent::click(owner, "order41-0"))
            .await,
    );

    report.host_calls = host.calls();
    Ok(report)
}

/// Tag an event with the message it was clicked on, as the platform does
fn from_message(event: InteractionEvent, message_id: Option<u64>) -> InteractionEvent {
    match message_id {
        Some(id) => event.on_message(id),
        None => event,
    }
}

async fn report_toppings(ctx: ComponentContext) -> anyhow::Result<()> {
    let values = ctx.view.lock().await.values_at(0)?;
    tracing::info!("toppings chosen: {}", values.join(", "));
    Ok(())
}

async fn open_feedback_form(ctx: ComponentContext) -> anyhow::Result<()> {
    let mut modal = Modal::new("Feedback");
    modal
        .set_custom_id("feedback-form")
        .set_author(ctx.event.user.clone())
        .set_parent_view(ctx.view.clone())
        .on_submit(Callback::new(thank_for_feedback));
    modal.add_inputs([
        TextInput::new("Rating (1-5)").set_max_length(1),
        TextInput::new("Comments")
            .set_style(TextStyle::Paragraph)
            .set_required(false),
    ])?;
    ctx.open_modal(modal).await
}

async fn thank_for_feedback(ctx: ModalContext) -> anyhow::Result<()> {
    let rating = ctx.modal.value_at(0)?.unwrap_or("?").to_string();
    let comments = ctx.modal.value_at(1)?.unwrap_or("").to_string();
    tracing::info!(
        "feedback from {}: {} stars, {:?}",
        ctx.event.user.name,
        rating,
        comments
    );
    if let Some(view) = &ctx.view {
        view.lock().await.close_view(true).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> Config {
        let mut config = Config::default();
        config.demo.step_delay_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_demo_outcomes() {
        let report = run_demo(&quick_config()).await.unwrap();
        let outcomes: Vec<Outcome> = report.steps.iter().map(|s| s.outcome).collect();
        assert_eq!(
            outcomes,
            [
                Outcome::Rejected,
                Outcome::Handled {
                    invoked: 1,
                    failed: 0
                },
                Outcome::Handled {
                    invoked: 0,
                    failed: 0
                },
                Outcome::Handled {
                    invoked: 2,
                    failed: 1
                },
                Outcome::Handled {
                    invoked: 2,
                    failed: 0
                },
                Outcome::Handled {
                    invoked: 1,
                    failed: 0
                },
                Outcome::Handled {
                    invoked: 1,
                    failed: 0
                },
                Outcome::Unrouted,
            ]
        );
    }

    #[tokio::test]
    async fn test_demo_host_calls() {
        let report = run_demo(&quick_config()).await.unwrap();
        let names: Vec<&str> = report.host_calls.iter().map(HostCall::name).collect();
        assert_eq!(
            names,
            [
                "send",
                "edit",
                "send",
                "send",
                "respond_with_modal",
                "edit"
            ]
        );

        match &report.host_calls[1] {
            HostCall::Edit {
                layout: Some(layout),
                ..
            } => assert!(layout.all_disabled(), "Confirm view is disabled after use"),
            other => panic!("Expected disabling edit, got {:?}", other),
        }
        assert!(matches!(
            report.host_calls.last(),
            Some(HostCall::Edit { layout: None, .. })
        ));
    }
}
