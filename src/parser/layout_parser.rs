// Control panel layout -> typed feature extraction
use crate::model::{
    AncFeature, AncItem, AncMode, AutoOffTimer, EqFeature, Features, KeyEvent, KeyFunctionFeature,
    SettingItem,
};
use crate::utils::{as_integral, code_text, int_field, list_field, string_field, string_or};
use serde_json::Value;
use tracing::debug;

const DEFAULT_EQ_BANDS: i64 = 10;

/// Layout block kind, selected by the integer `type` code of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutKind {
    Eq,
    FindEarphone,
    Settings,
    ChannelBalance,
    Anc,
    KeyFunction,
    Reset,
    DeviceName,
    AutoOffTimer,
    /// Textual form of the unmatched code, `None` when it is missing.
    Unknown(String),
}

impl LayoutKind {
    /// Only integral numbers select a kind; `"2"` stays unknown.
    pub fn from_code(code: Option<&Value>) -> Self {
        match code.and_then(as_integral) {
            Some(2) => LayoutKind::Eq,
            Some(3) => LayoutKind::FindEarphone,
            Some(4) => LayoutKind::Settings,
            Some(8) => LayoutKind::ChannelBalance,
            Some(9) => LayoutKind::Anc,
            Some(10) => LayoutKind::KeyFunction,
            Some(100) => LayoutKind::Reset,
            Some(101) => LayoutKind::DeviceName,
            Some(102) => LayoutKind::AutoOffTimer,
            _ => LayoutKind::Unknown(code_text(code)),
        }
    }

    pub fn of(layout: &Value) -> Self {
        Self::from_code(layout.get("type"))
    }

    pub fn name(&self) -> String {
        let fixed = match self {
            LayoutKind::Eq => "eq",
            LayoutKind::FindEarphone => "find_earphone",
            LayoutKind::Settings => "settings",
            LayoutKind::ChannelBalance => "channel_balance",
            LayoutKind::Anc => "anc",
            LayoutKind::KeyFunction => "key_function",
            LayoutKind::Reset => "reset",
            LayoutKind::DeviceName => "device_name",
            LayoutKind::AutoOffTimer => "auto_off_timer",
            LayoutKind::Unknown(code) => return format!("unknown_{}", code),
        };
        fixed.to_string()
    }
}

/// Symbolic name of a settings item `type` code, `type_<code>` when unrecognized.
pub fn setting_type_name(code: Option<&Value>) -> String {
    let name = match code.and_then(as_integral) {
        Some(1) => "firmware_update",
        Some(3) => "reset_default",
        Some(100) => "factory_reset",
        Some(200) => "sleep_mode",
        Some(203) => "game_mode",
        _ => return format!("type_{}", code_text(code)),
    };
    name.to_string()
}

pub trait LayoutParser {
    fn extract(&self, layouts: &[Value]) -> Features;
}

pub struct ControlPanelParser;

impl ControlPanelParser {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutParser for ControlPanelParser {
    /// Later layouts of the same kind overwrite earlier ones.
    fn extract(&self, layouts: &[Value]) -> Features {
        let mut features = Features::default();

        for layout in layouts {
            let kind = LayoutKind::of(layout);
            match &kind {
                LayoutKind::Eq => features.eq = Some(parse_eq(layout)),
                LayoutKind::FindEarphone => features.find_earphone = Some(true),
                LayoutKind::Settings => features.settings = Some(parse_settings(layout)),
                LayoutKind::ChannelBalance => features.channel_balance = Some(true),
                LayoutKind::Anc => features.anc = Some(parse_anc(layout)),
                LayoutKind::KeyFunction => features.key_function = Some(parse_key_function(layout)),
                LayoutKind::DeviceName => features.device_name = Some(true),
                LayoutKind::AutoOffTimer => {
                    features.auto_off_timer = Some(AutoOffTimer {
                        cmdid: int_field(layout, "cmdid"),
                        repeat: int_field(layout, "repeat"),
                    })
                }
                LayoutKind::Reset | LayoutKind::Unknown(_) => {
                    debug!("Skipping layout without extraction rule: {}", kind.name());
                }
            }
        }

        features
    }
}

fn parse_eq(layout: &Value) -> EqFeature {
    EqFeature {
        bands: int_field(layout, "count").unwrap_or(DEFAULT_EQ_BANDS),
        mindb: int_field(layout, "mindb"),
        maxdb: int_field(layout, "maxdb"),
        freq: string_or(layout, "freq", ""),
        characteristic: string_or(layout, "character", ""),
        presets: list_field(layout, "sys_eq")
            .map(|preset| string_or(preset, "name", ""))
            .collect(),
    }
}

fn parse_settings(layout: &Value) -> Vec<SettingItem> {
    list_field(layout, "items")
        .map(|item| SettingItem {
            name: string_or(item, "title", ""),
            kind: setting_type_name(item.get("type")),
            cmdid: int_field(item, "cmdid"),
            cmd: string_field(item, "cmd"),
        })
        .collect()
}

fn parse_anc(layout: &Value) -> AncFeature {
    let modes = list_field(layout, "modes")
        .map(|mode| {
            let items: Vec<AncItem> = list_field(mode, "items")
                .map(|item| AncItem {
                    name: string_or(item, "name", ""),
                    startcmdid: int_field(item, "startcmdid"),
                    endcmdid: int_field(item, "endcmdid"),
                })
                .collect();

            AncMode {
                name: string_or(mode, "name", ""),
                startcmdid: int_field(mode, "startcmdid"),
                endcmdid: int_field(mode, "endcmdid"),
                defaultcmd: int_field(mode, "defaultcmd"),
                viewtype: int_field(mode, "viewtype"),
                items: if items.is_empty() { None } else { Some(items) },
            }
        })
        .collect();

    AncFeature { modes }
}

fn parse_key_function(layout: &Value) -> KeyFunctionFeature {
    let events = layout
        .get("music")
        .map(|music| list_field(music, "event"))
        .into_iter()
        .flatten()
        .filter_map(|event| {
            // a missing "left" counts as an empty record
            let functions = match event.get("left") {
                None => Vec::new(),
                Some(left @ Value::Object(_)) => list_field(left, "list")
                    .map(|function| string_or(function, "name", ""))
                    .collect(),
                Some(_) => return None,
            };
            Some(KeyEvent {
                name: string_or(event, "name", ""),
                functions,
            })
        })
        .collect();

    KeyFunctionFeature { events }
}
