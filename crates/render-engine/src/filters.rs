//! Built-in `<filter>` blocks.
//!
//! Basic Motion is computed per clip. Time Remap and the Premiere text
//! generator are fixed templates captured from the editors; only the
//! parts that vary per clip are parameters here.

use xmeml_common::TargetEditor;

use crate::xml::XmlWriter;

/// Parameters of the Basic Motion filter on one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicMotion {
    pub scale_percent: u32,
    pub center: (String, String),
    /// Resolve wants the filter bounded to the clip's source range.
    pub source_range: Option<(u64, u64)>,
}

pub fn write_basic_motion(w: &mut XmlWriter, motion: &BasicMotion) {
    w.open("filter");
    if let Some((start, end)) = motion.source_range {
        w.leaf("enabled", "TRUE");
        w.leaf("start", start);
        w.leaf("end", end);
    }
    w.open("effect");
    w.leaf("name", "Basic Motion");
    w.leaf("effectid", "basic");
    w.leaf("effectcategory", "motion");
    w.leaf("effecttype", "motion");
    w.leaf("mediatype", "video");
    w.leaf("pproBypass", "false");

    let premiere = [("authoringApp", "PremierePro")];
    w.open_with("parameter", &premiere);
    w.leaf("parameterid", "scale");
    w.leaf("name", "Scale");
    w.leaf("valuemin", 0);
    w.leaf("valuemax", 1000);
    w.leaf("value", motion.scale_percent);
    w.close("parameter");

    w.open_with("parameter", &premiere);
    w.leaf("parameterid", "rotation");
    w.leaf("name", "Rotation");
    w.leaf("valuemin", -8640);
    w.leaf("valuemax", 8640);
    w.leaf("value", 0);
    w.close("parameter");

    w.open_with("parameter", &premiere);
    w.leaf("parameterid", "center");
    w.leaf("name", "Center");
    w.open("value");
    w.leaf("horiz", &motion.center.0);
    w.leaf("vert", &motion.center.1);
    w.close("value");
    w.close("parameter");

    w.open_with("parameter", &premiere);
    w.leaf("parameterid", "centerOffset");
    w.leaf("name", "Anchor Point");
    w.open("value");
    w.leaf("horiz", 0);
    w.leaf("vert", 0);
    w.close("value");
    w.close("parameter");

    w.close("effect");
    w.close("filter");
}

/// Whether a frozen clip gets a Time Remap filter for `target`.
/// Premiere has no equivalent in this format.
pub fn freeze_supported(target: TargetEditor) -> bool {
    target == TargetEditor::Resolve
}

struct RemapKeyframe {
    when: u64,
    value: u32,
    marker: &'static str,
}

const REMAP_KEYFRAMES: [RemapKeyframe; 4] = [
    RemapKeyframe { when: 0, value: 0, marker: "speedkfstart" },
    RemapKeyframe { when: 86_400, value: 0, marker: "speedkfin" },
    RemapKeyframe { when: 86_520, value: 0, marker: "speedkfout" },
    RemapKeyframe { when: 1_440_001, value: 1, marker: "speedkfend" },
];

/// Resolve Time Remap at speed 0, holding the first frame.
pub fn write_time_remap(w: &mut XmlWriter) {
    w.open("filter");
    w.leaf("enabled", "TRUE");
    w.leaf("start", -1);
    w.leaf("end", -1);
    w.open("effect");
    w.leaf("name", "Time Remap");
    w.leaf("effectid", "timeremap");
    w.leaf("effecttype", "motion");
    w.leaf("mediatype", "video");
    w.leaf("effectcategory", "motion");

    w.open("parameter");
    w.leaf("name", "speed");
    w.leaf("parameterid", "speed");
    w.leaf("value", 0);
    w.leaf("valuemin", -10000);
    w.leaf("valuemax", 10000);
    w.close("parameter");

    for flag in ["reverse", "frameblending"] {
        w.open("parameter");
        w.leaf("name", flag);
        w.leaf("parameterid", flag);
        w.leaf("value", "FALSE");
        w.close("parameter");
    }

    w.open("parameter");
    w.leaf("name", "variablespeed");
    w.leaf("parameterid", "variablespeed");
    w.leaf("value", 0);
    w.leaf("valuemin", 0);
    w.leaf("valuemax", 1);
    w.close("parameter");

    w.open("parameter");
    w.leaf("name", "graphdict");
    w.leaf("parameterid", "graphdict");
    for kf in &REMAP_KEYFRAMES {
        w.open("keyframe");
        w.leaf("when", kf.when);
        w.leaf("value", kf.value);
        w.leaf("speedvirtualkf", "TRUE");
        w.leaf(kf.marker, "TRUE");
        w.close("keyframe");
    }
    w.leaf("valuemin", 0);
    w.leaf("valuemax", 0);
    w.open("interpolation");
    w.leaf("name", "FCPCurve");
    w.close("interpolation");
    w.close("parameter");

    w.close("effect");
    w.close("filter");
}

/// Control type and bounds of a text generator parameter.
struct Control {
    kind: u8,
    lower: &'static str,
    upper: &'static str,
}

struct TextParameter {
    name: &'static str,
    control: Option<Control>,
    value: &'static str,
}

const fn param(name: &'static str, value: &'static str) -> TextParameter {
    TextParameter { name, control: None, value }
}

const fn ctl(
    name: &'static str,
    kind: u8,
    lower: &'static str,
    upper: &'static str,
    value: &'static str,
) -> TextParameter {
    TextParameter {
        name,
        control: Some(Control { kind, lower, upper }),
        value,
    }
}

const TEXT_SOURCE_HASH: &str = "2d03c7ab-2985-2ec9-45bf-033100000154";

// Serialized Premiere text layer; the editor replaces the text from the
// effect name on import.
const TEXT_SOURCE_VALUE: &str = "PAEAAAAAAABEMyIRDAAAAAAABgAKAAQABgAAAGQAAAAAAF4AGAAQAAwAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAFgAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAgAAAAAABcABwBeAAAAAAAAARAAAAAcAAAALAAAAAAAAQBo////bP///3D///90////AQAAAAQAAAAGAAAAVGFob21hAAABAAAADAAAAAgADgAEAAgACAAAAGgAAAA8AAAAAAA2ABQAAAAAAAAAAAAAAAAAEAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAADAAAAAgABAA2AAAAAgAAAAwAAAAMAAAAAACAQPT////4/////P///wQABAAEAAAACAAAAEJvbmpvdXINAAAAAA==";

const KF_FALSE: &str = "-91445760000000000,false,0,0,0,0,0,0";
const KF_TRUE: &str = "-91445760000000000,true,0,0,0,0,0,0";
const KF_ZERO: &str = "-91445760000000000,0.,0,0,0,0,0,0";
const KF_HUNDRED: &str = "-91445760000000000,100.,0,0,0,0,0,0";
const KF_EIGHT: &str = "-91445760000000000,8.,0,0,0,0,0,0";

/// Parameters 2..=22 of the GraphicAndType filter, in id order.
const TEXT_PARAMETERS: [TextParameter; 21] = [
    ctl("Transformation", 11, "false", "false", KF_FALSE),
    param("Position", "-91445760000000000,0.5:0.5,0,0,0,0,0,0,5,4,0,0,0,0"),
    ctl("Echelle", 2, "0", "4000", KF_HUNDRED),
    ctl("Echelle horizontale", 2, "0", "4000", KF_HUNDRED),
    ctl(" ", 4, "false", "true", KF_TRUE),
    ctl("Rotation", 3, "-32768", "32767", KF_ZERO),
    ctl("Opacité", 2, "0", "100", KF_HUNDRED),
    param("Point d'ancrage", "-91445760000000000,0:0,0,0,0,0,0,0,5,4,0,0,0,0"),
    ctl("", 12, "false", "false", KF_FALSE),
    ctl(" ", 8, "0", "32768", KF_ZERO),
    ctl(" ", 8, "0", "32768", KF_ZERO),
    ctl("start", 8, "-100", "1000000000", KF_EIGHT),
    ctl("end", 8, "-100", "1000000000", KF_EIGHT),
    ctl(" ", 4, "false", "true", KF_FALSE),
    ctl(" ", 4, "false", "true", KF_FALSE),
    ctl(" ", 4, "false", "true", KF_FALSE),
    ctl(" ", 4, "false", "true", KF_FALSE),
    ctl("Largeur du parent", 2, "0", "20000", KF_ZERO),
    ctl("Hauteur du parent", 2, "0", "20000", KF_ZERO),
    ctl("Rotation du parent", 3, "-32768", "32767", KF_ZERO),
    ctl(" ", 4, "false", "true", KF_FALSE),
];

/// Premiere "Essential Graphics" text layer carrying `text` as its name.
pub fn write_text_filter(w: &mut XmlWriter, text: &str) {
    let premiere = [("authoringApp", "PremierePro")];

    w.open("filter");
    w.open("effect");
    w.leaf("name", text);
    w.leaf("effectid", "GraphicAndType");
    w.leaf("effectcategory", "graphic");
    w.leaf("effecttype", "filter");
    w.leaf("mediatype", "video");
    w.leaf("pproBypass", "false");

    w.open_with("parameter", &premiere);
    w.leaf("parameterid", 1);
    w.leaf("name", "Texte source");
    w.leaf("hash", TEXT_SOURCE_HASH);
    w.leaf("value", TEXT_SOURCE_VALUE);
    w.close("parameter");

    for (index, p) in TEXT_PARAMETERS.iter().enumerate() {
        w.open_with("parameter", &premiere);
        w.leaf("parameterid", index + 2);
        w.leaf("name", p.name);
        w.leaf("IsTimeVarying", "false");
        if let Some(control) = &p.control {
            w.leaf("ParameterControlType", control.kind);
            w.leaf("LowerBound", control.lower);
            w.leaf("UpperBound", control.upper);
        }
        w.leaf("value", p.value);
        w.close("parameter");
    }

    w.close("effect");
    w.close("filter");
}
