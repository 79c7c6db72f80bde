use crate::sequence::Alignment;
use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

// ----------------------------------------------------------------------------
// Preset
// ----------------------------------------------------------------------------

/// Named clades of rust fungi.
#[derive(Clone, Copy, Debug, Deserialize, EnumIter, Eq, Hash, PartialEq, Serialize)]
pub enum Preset {
    /// Pucciniales with a sequenced reference genome.
    ///
    /// ```
    /// let preset = branchsite::classify::Preset::PuccinialesGenome;
    /// ```
    #[serde(rename = "pucciniales_genome")]
    PuccinialesGenome,
    /// All Pucciniales.
    #[serde(rename = "pucciniales")]
    Pucciniales,
}

impl Display for Preset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Preset::PuccinialesGenome => "pucciniales_genome",
            Preset::Pucciniales => "pucciniales",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Preset {
    type Err = Report;

    /// Returns a [`Preset`] converted from a [`str`].
    ///
    /// ```rust
    /// use branchsite::classify::Preset;
    /// use std::str::FromStr;
    ///
    /// assert_eq!(Preset::Pucciniales, Preset::from_str("pucciniales")?);
    /// assert!(Preset::from_str("Puccinia_graminis").is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn from_str(name: &str) -> Result<Self, Report> {
        let preset = Preset::iter().find(|p| p.to_string() == name);
        match preset {
            Some(preset) => Ok(preset),
            None => Err(eyre!("Unknown clade preset: {name}"))
                .suggestion(format!("Please choose from: {}", Preset::iter().join(", "))),
        }
    }
}

impl Preset {
    /// Taxa of the preset.
    pub fn taxa(&self) -> &'static [&'static str] {
        match self {
            Preset::PuccinialesGenome => &["Puccinia_triticina", "Melampsora_laricis_populina", "Puccinia_graminis"],
            Preset::Pucciniales => {
                &["Puccinia_triticina", "Melampsora_laricis_populina", "Puccinia_graminis", "Hemileia_vastatrix"]
            }
        }
    }

    /// Returns a [`tabled::Table`] of the presets and their taxa.
    ///
    /// ```rust
    /// let table = branchsite::classify::Preset::list();
    /// assert!(table.to_string().contains("Hemileia_vastatrix"));
    /// ```
    pub fn list() -> tabled::Table {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(["Name", "Taxa"]);
        Preset::iter().for_each(|preset| {
            builder.push_record([preset.to_string(), preset.taxa().join(", ")]);
        });
        builder.build()
    }
}

// ----------------------------------------------------------------------------
// Clade
// ----------------------------------------------------------------------------

/// The foreground clade, as explicit taxa or a named [`Preset`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Clade {
    Taxa(Vec<String>),
    Preset(Preset),
}

impl Display for Clade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Clade::Taxa(taxa) => write!(f, "{}", taxa.join(",")),
            Clade::Preset(preset) => write!(f, "{preset}"),
        }
    }
}

impl Clade {
    /// Build a clade from command-line values, a single preset name selects the preset.
    ///
    /// ```rust
    /// use branchsite::classify::{Clade, Preset};
    ///
    /// let clade = Clade::from_args(&["pucciniales".to_string()]);
    /// assert_eq!(clade, Some(Clade::Preset(Preset::Pucciniales)));
    ///
    /// let clade = Clade::from_args(&["Puccinia_graminis".to_string(), "Puccinia_triticina".to_string()]);
    /// assert_eq!(clade.map(|c| c.taxa().len()), Some(2));
    ///
    /// assert_eq!(Clade::from_args(&[]), None);
    /// ```
    pub fn from_args(values: &[String]) -> Option<Self> {
        match values {
            [] => None,
            [name] => match Preset::from_str(name) {
                Ok(preset) => Some(Clade::Preset(preset)),
                Err(_) => Some(Clade::Taxa(values.to_vec())),
            },
            _ => Some(Clade::Taxa(values.to_vec())),
        }
    }

    /// All taxa of the clade.
    pub fn taxa(&self) -> Vec<&str> {
        match self {
            Clade::Taxa(taxa) => taxa.iter().map(String::as_str).collect(),
            Clade::Preset(preset) => preset.taxa().to_vec(),
        }
    }

    /// Taxa of the clade that are present in the alignment, in clade order.
    pub fn resolve(&self, alignment: &Alignment) -> Vec<String> {
        self.taxa().into_iter().filter(|taxon| alignment.contains(taxon)).map(String::from).collect()
    }
}
