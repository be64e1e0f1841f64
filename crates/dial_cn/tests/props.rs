//! Loading control configuration from the dashboard's JSON settings
#![cfg(feature = "serde")]

use dial_cn::prelude::*;
use dial_cn::{SelectBuilder, SelectProps, SliderBuilder, SliderProps, SwitchProps, TabsProps};

#[test]
fn slider_props_fill_missing_fields_with_defaults() {
    let props: SliderProps =
        serde_json::from_str(r#"{ "max": 2.0, "step": 0.1, "default_value": [0.7] }"#).unwrap();
    assert_eq!(props.min, 0.0);
    assert_eq!(props.orientation, Orientation::Horizontal);

    let hub = ListenerHub::new();
    let s = SliderBuilder::from_props(props).build(&hub);
    assert_eq!(s.values(), vec![0.7]);
}

#[test]
fn select_entries_are_tagged() {
    let props: SelectProps = serde_json::from_str(
        r#"{
            "placeholder": "Model",
            "entries": [
                { "kind": "label", "text": "Hosted" },
                { "kind": "option", "value": "gpt", "label": "GPT" },
                { "kind": "separator" },
                { "kind": "option", "value": "local", "label": "Local", "disabled": true }
            ]
        }"#,
    )
    .unwrap();

    let hub = ListenerHub::new();
    let model = SelectBuilder::from_props(props).build(&hub);
    assert_eq!(model.display_label(), "Model");
    assert_eq!(model.options().filter(|o| o.disabled).count(), 1);
}

#[test]
fn tabs_props_use_loop_key() {
    let props: TabsProps = serde_json::from_str(
        r#"{ "loop": false, "activation_mode": "manual", "orientation": "vertical" }"#,
    )
    .unwrap();
    assert!(!props.loop_focus);
    assert_eq!(props.activation_mode, ActivationMode::Manual);
    assert_eq!(props.orientation, Orientation::Vertical);
}

#[test]
fn switch_props_round_trip() {
    let props = SwitchProps {
        name: Some("streaming".into()),
        default_checked: true,
        ..Default::default()
    };
    let json = serde_json::to_string(&props).unwrap();
    let back: SwitchProps = serde_json::from_str(&json).unwrap();
    assert_eq!(back, props);
    assert_eq!(back.value, "on");
}
