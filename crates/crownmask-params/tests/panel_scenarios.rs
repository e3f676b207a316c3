//! Integration tests: operator scenarios driven through the public panel API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::rc::Rc;

use crownmask_params::{
    ChangeEvent, ChangeListener, ListenerContext, Parameter, ParameterPanel, ParameterVector,
    StandardDefaults,
};

const DEFAULTS: [f64; 9] = [2.0, 3.0, 50.0, 2.0, 0.0, 5.0, 2.0, 2.0, 1.0];

type Calls = Rc<RefCell<Vec<(ChangeEvent, ParameterVector)>>>;

/// Panel with one recording listener.
fn recorded_panel() -> (ParameterPanel, Calls) {
    let mut panel = ParameterPanel::with_standard_defaults("embryo.tif");
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    panel.add_listener(Rc::new(
        move |event: ChangeEvent, ctx: &mut ListenerContext<'_>| {
            sink.borrow_mut().push((event, *ctx.parameters()));
        },
    ));
    (panel, calls)
}

#[test]
fn retyping_the_current_value_is_silent_then_a_change_notifies_once() {
    let (mut panel, calls) = recorded_panel();

    panel.type_text(Parameter::SigmaFilter, "2");
    assert!(calls.borrow().is_empty(), "unchanged value must not notify");

    panel.type_text(Parameter::SigmaFilter, "2.5");
    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ChangeEvent::Filtering);
    assert_eq!(
        calls[0].1.as_array(),
        &[2.5, 3.0, 50.0, 2.0, 0.0, 5.0, 2.0, 2.0, 1.0]
    );
    assert_eq!(panel.parameters(), &calls[0].1);
}

#[test]
fn malformed_iteration_text_is_ignored() {
    let (mut panel, calls) = recorded_panel();

    panel.type_text(Parameter::NIterDiffusion, "xyz");

    assert!(calls.borrow().is_empty());
    assert_eq!(panel.parameters().as_array(), &DEFAULTS);
    assert_eq!(panel.control(Parameter::NIterDiffusion).text(), "3");
}

#[test]
fn malformed_strings_leave_every_side_untouched() {
    for raw in ["abc", "1.2.3", "-1", "", "2,5", "1e2"] {
        let (mut panel, calls) = recorded_panel();
        let before = panel.control(Parameter::Beta).clone();

        panel.type_text(Parameter::Beta, raw);

        assert_eq!(panel.control(Parameter::Beta), &before, "{raw:?} changed the control");
        assert!(calls.borrow().is_empty(), "{raw:?} notified");
        assert_eq!(panel.parameters().as_array(), &DEFAULTS);
    }
}

#[test]
fn repeated_stage_activity_notifies_once() {
    let (mut panel, calls) = recorded_panel();

    panel.type_text(Parameter::Epsilon, "3.5");
    panel.type_text(Parameter::Epsilon, "3.5");
    panel.type_text(Parameter::Epsilon, "3.50");

    let events: Vec<_> = calls.borrow().iter().map(|(e, _)| *e).collect();
    assert_eq!(events, vec![ChangeEvent::Masking]);
}

#[test]
fn each_stage_raises_its_own_event() {
    let (mut panel, calls) = recorded_panel();

    panel.move_slider(Parameter::SigmaFilter, 30);
    panel.move_slider(Parameter::KappaDiffusion, 20);
    panel.move_slider(Parameter::SigmaGradient, 10);
    panel.move_slider(Parameter::Gamma, -20);

    let events: Vec<_> = calls.borrow().iter().map(|(e, _)| *e).collect();
    assert_eq!(
        events,
        vec![
            ChangeEvent::Filtering,
            ChangeEvent::Diffusion,
            ChangeEvent::Derivatives,
            ChangeEvent::Masking,
        ]
    );
    assert_eq!(
        panel.parameters().as_array(),
        &[3.0, 3.0, 20.0, 1.0, -2.0, 5.0, 2.0, 2.0, 1.0]
    );
}

#[test]
fn quantization_round_trip_for_typed_values() {
    for (raw, expected) in [("0.3", 3), ("1.24", 12), ("1.26", 13), ("12.5", 125)] {
        let (mut panel, _calls) = recorded_panel();
        panel.type_text(Parameter::Alpha, raw);
        let control = panel.control(Parameter::Alpha);
        assert_eq!(control.position(), expected, "typed {raw:?}");
        let parsed: f64 = raw.parse().unwrap();
        let quantized = (parsed * 10.0).round() / 10.0;
        assert!((control.value() - quantized).abs() < 1e-12, "typed {raw:?}");
    }
}

#[test]
fn listeners_run_in_registration_order() {
    let mut panel = ParameterPanel::with_standard_defaults("embryo.tif");
    let order = Rc::new(RefCell::new(Vec::new()));
    for name in ["tracker", "viewer", "estimator"] {
        let order = Rc::clone(&order);
        panel.add_listener(Rc::new(
            move |_: ChangeEvent, _: &mut ListenerContext<'_>| order.borrow_mut().push(name),
        ));
    }

    panel.press_go();

    assert_eq!(*order.borrow(), vec!["tracker", "viewer", "estimator"]);
}

#[test]
fn identical_write_back_does_not_storm() {
    let (mut panel, calls) = recorded_panel();
    panel.add_listener(Rc::new(
        |event: ChangeEvent, ctx: &mut ListenerContext<'_>| {
            if event == ChangeEvent::Masking {
                let delta = ctx.parameters()[Parameter::Delta];
                ctx.type_text(Parameter::Delta, format!("{delta}"));
            }
        },
    ));

    panel.move_slider(Parameter::Delta, 25);

    assert_eq!(calls.borrow().len(), 1);
    assert!((panel.parameters()[Parameter::Delta] - 2.5).abs() < f64::EPSILON);
}

#[test]
fn write_back_goes_through_dispatch() {
    let (mut panel, calls) = recorded_panel();
    // Keep sigma_gradient equal to sigma_filter.
    panel.add_listener(Rc::new(
        |event: ChangeEvent, ctx: &mut ListenerContext<'_>| {
            if event == ChangeEvent::Filtering {
                let sigma = ctx.parameters()[Parameter::SigmaFilter];
                ctx.type_text(Parameter::SigmaGradient, format!("{sigma}"));
            }
        },
    ));

    panel.type_text(Parameter::SigmaFilter, "1.5");

    let events: Vec<_> = calls.borrow().iter().map(|(e, _)| *e).collect();
    assert_eq!(events, vec![ChangeEvent::Filtering, ChangeEvent::Derivatives]);
    assert!((panel.parameters()[Parameter::SigmaGradient] - 1.5).abs() < f64::EPSILON);
    assert_eq!(panel.control(Parameter::SigmaGradient).position(), 15);
}

#[test]
fn listener_can_be_removed_between_events() {
    let (mut panel, calls) = recorded_panel();
    let extra_calls = Rc::new(RefCell::new(0_u32));
    let counter = Rc::clone(&extra_calls);
    let extra: Rc<dyn ChangeListener> =
        Rc::new(move |_: ChangeEvent, _: &mut ListenerContext<'_>| *counter.borrow_mut() += 1);
    panel.add_listener(Rc::clone(&extra));

    panel.select_tab(1);
    assert!(panel.remove_listener(&extra));
    panel.select_tab(2);

    assert_eq!(*extra_calls.borrow(), 1);
    assert_eq!(calls.borrow().len(), 2);
}

#[test]
fn settings_round_trip_preserves_vector() {
    let codec = StandardDefaults;
    let vector = ParameterVector::new([0.7, 9.0, 33.0, 4.1, -4.5, 19.5, 0.1, 12.0, 0.4]);
    let settings = vector.to_settings_map(&codec);
    let decoded = ParameterVector::from_settings_map(&settings, &codec).unwrap();
    assert_eq!(decoded, vector);

    let mut panel = ParameterPanel::with_standard_defaults("embryo.tif");
    assert!(panel.set_settings(&settings));
    assert_eq!(panel.parameters(), &vector);
    assert_eq!(panel.settings(), settings);
}
