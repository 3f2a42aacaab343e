//! Pluggable clip effects.
//!
//! An effect contributes one complete `<filter>` element to every clip
//! rendered from the media record it is attached to. The renderer copies
//! the fragment verbatim.

use std::fmt::Debug;

/// A filter fragment attached to a media record.
pub trait Effect: Debug + Send + Sync {
    /// Short identifier, used in logs and manifests.
    fn name(&self) -> &str;

    /// Complete `<filter>...</filter>` XML fragment.
    fn render(&self) -> String;
}

/// Premiere Lumetri color correction with a single "whites" adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lumetri {
    /// Whites offset, -150..=150.
    pub whites: i32,
}

impl Lumetri {
    pub fn new(whites: i32) -> Self {
        Self {
            whites: whites.clamp(-150, 150),
        }
    }
}

impl Effect for Lumetri {
    fn name(&self) -> &str {
        "lumetri"
    }

    fn render(&self) -> String {
        let mut xml = String::with_capacity(768);
        xml.push_str("<filter>\n");
        xml.push_str("\t<effect>\n");
        xml.push_str("\t\t<name></name>\n");
        xml.push_str("\t\t<effectid>Lumetri</effectid>\n");
        xml.push_str("\t\t<effecttype>filter</effecttype>\n");
        xml.push_str("\t\t<mediatype>video</mediatype>\n");
        xml.push_str("\t\t<pproBypass>false</pproBypass>\n");
        xml.push_str("\t\t<parameter authoringApp=\"PremierePro\">\n");
        xml.push_str("\t\t\t<parameterid>1</parameterid>\n");
        xml.push_str("\t\t\t<name>Blob</name>\n");
        xml.push_str("\t\t\t<hash>63866a15-9327-e4cb-ff31-c9ea0000000e</hash>\n");
        xml.push_str("\t\t\t<value>/v4=</value>\n");
        xml.push_str("\t\t</parameter>\n");
        xml.push_str("\t\t<parameter authoringApp=\"PremierePro\">\n");
        xml.push_str("\t\t\t<parameterid>15</parameterid>\n");
        xml.push_str("\t\t\t<name>Blancs</name>\n");
        xml.push_str("\t\t\t<IsTimeVarying>false</IsTimeVarying>\n");
        xml.push_str("\t\t\t<ParameterControlType>8</ParameterControlType>\n");
        xml.push_str("\t\t\t<LowerBound>-150</LowerBound>\n");
        xml.push_str("\t\t\t<UpperBound>150</UpperBound>\n");
        xml.push_str("\t\t\t<LowerUIBound>-100</LowerUIBound>\n");
        xml.push_str("\t\t\t<UpperUIBound>100</UpperUIBound>\n");
        xml.push_str(&format!(
            "\t\t\t<value>-91445760000000000,{}.,0,0,0,0,0,0</value>\n",
            self.whites
        ));
        xml.push_str("\t\t</parameter>\n");
        xml.push_str("\t</effect>\n");
        xml.push_str("</filter>\n");
        xml
    }
}
