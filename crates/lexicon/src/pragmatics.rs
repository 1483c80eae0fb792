//! Pragmatic-order recursion
//!
//! Three model families express mutual recursion between an nth-order
//! speaker and an nth-order listener. They share the base case
//! (speaker 0 = column-normalized lexicon, listener 0 = row-normalized
//! lexicon) and differ only in how normalization alternates above it:
//!
//! | Model           | Speaker(n > 0)                 | Listener(n > 0)                |
//! |-----------------|--------------------------------|--------------------------------|
//! | Frank–Goodman   | cols(Listener(n-1))            | rows(Speaker(n))               |
//! | Blokpoel et al. | cols(rows(Speaker(n-1)))       | rows(cols(Listener(n-1)))      |
//! | Franke–Degen    | cols(Listener(n-1))            | Speaker(n-1)                   |
//!
//! Speaker matrices are column-stochastic (a column is a distribution over
//! signals for one referent); listener matrices are row-stochastic except
//! Franke–Degen listeners, which carry no extra row normalization.

use crate::error::LexiconError;
use crate::lexicon::Lexicon;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PragmaticModel {
    FrankGoodman,
    #[default]
    BlokpoelEtAl,
    FrankeDegen,
}

impl PragmaticModel {
    pub const ALL: [PragmaticModel; 3] = [
        PragmaticModel::FrankGoodman,
        PragmaticModel::BlokpoelEtAl,
        PragmaticModel::FrankeDegen,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PragmaticModel::FrankGoodman => "frank-goodman",
            PragmaticModel::BlokpoelEtAl => "blokpoel-et-al",
            PragmaticModel::FrankeDegen => "franke-degen",
        }
    }

    /// nth-order speaker matrix of `lexicon` under this model
    pub fn speaker(&self, lexicon: &Lexicon, order: usize) -> Lexicon {
        if order == 0 {
            return lexicon.normalize_columns();
        }
        match self {
            PragmaticModel::FrankGoodman | PragmaticModel::FrankeDegen => {
                self.listener(lexicon, order - 1).normalize_columns()
            }
            PragmaticModel::BlokpoelEtAl => {
                let mut speaker = lexicon.normalize_columns();
                for _ in 0..order {
                    speaker = speaker.normalize_rows().normalize_columns();
                }
                speaker
            }
        }
    }

    /// nth-order listener matrix of `lexicon` under this model
    pub fn listener(&self, lexicon: &Lexicon, order: usize) -> Lexicon {
        if order == 0 {
            return lexicon.normalize_rows();
        }
        match self {
            PragmaticModel::FrankGoodman => self.speaker(lexicon, order).normalize_rows(),
            PragmaticModel::BlokpoelEtAl => {
                let mut listener = lexicon.normalize_rows();
                for _ in 0..order {
                    listener = listener.normalize_columns().normalize_rows();
                }
                listener
            }
            PragmaticModel::FrankeDegen => self.speaker(lexicon, order - 1),
        }
    }
}

impl fmt::Display for PragmaticModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PragmaticModel {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "frank-goodman" | "fg" => Ok(PragmaticModel::FrankGoodman),
            "blokpoel-et-al" | "blokpoel" => Ok(PragmaticModel::BlokpoelEtAl),
            "franke-degen" | "fd" => Ok(PragmaticModel::FrankeDegen),
            _ => Err(LexiconError::MalformedInput(format!(
                "unknown pragmatic model: {s}"
            ))),
        }
    }
}

impl Lexicon {
    /// nth-order pragmatic speaker, dispatched on this lexicon's model
    pub fn set_order_as_speaker(&self, order: usize) -> Lexicon {
        self.model().speaker(self, order)
    }

    /// nth-order pragmatic listener, dispatched on this lexicon's model
    pub fn set_order_as_listener(&self, order: usize) -> Lexicon {
        self.model().listener(self, order)
    }
}
