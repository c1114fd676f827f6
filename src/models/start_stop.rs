// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    control_block::start_stop_unit::StartStopUnitFields, models::error::MaintError,
};

/// Highest value the 4-bit POWER CONDITION field can carry.
pub const MAX_POWER_CONDITION: u8 = 0x0F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStopAction {
    Start,
    Stop,
}

/// One observed command-line flag, in the order it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStopFlag {
    Eject,
    FormatLayer(u32),
    Immediate(bool),
    Load,
    LoadEjectBit,
    PowerCondition(u8),
    Start,
    Stop,
}

/// The merged result of all start/stop flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartStopIntent {
    pub action: Option<StartStopAction>,
    pub load_eject: bool,
    pub immediate: bool,
    pub power_condition: u8,
    pub format_layer: Option<u32>,
}

impl StartStopIntent {
    /// Fold `flags` into one intent, rejecting contradictions.
    pub fn resolve<I>(flags: I) -> Result<Self, MaintError>
    where I: IntoIterator<Item = StartStopFlag> {
        flags
            .into_iter()
            .try_fold(Self::default(), Self::apply)?
            .finish()
    }

    fn apply(mut self, flag: StartStopFlag) -> Result<Self, MaintError> {
        match flag {
            StartStopFlag::Eject => {
                self.load_eject = true;
                self.set_action(StartStopAction::Stop)?;
            },
            StartStopFlag::Load => {
                self.load_eject = true;
                self.set_action(StartStopAction::Start)?;
            },
            StartStopFlag::LoadEjectBit => self.load_eject = true,
            StartStopFlag::Start => self.set_action(StartStopAction::Start)?,
            StartStopFlag::Stop => self.set_action(StartStopAction::Stop)?,
            StartStopFlag::Immediate(immediate) => self.immediate = immediate,
            StartStopFlag::FormatLayer(n) => self.format_layer = Some(n),
            StartStopFlag::PowerCondition(pc) if pc > MAX_POWER_CONDITION => {
                return Err(MaintError::Usage(format!(
                    "power condition {pc:#x} exceeds {MAX_POWER_CONDITION:#x}"
                )));
            },
            StartStopFlag::PowerCondition(pc) => self.power_condition = pc,
        }
        Ok(self)
    }

    fn set_action(&mut self, wanted: StartStopAction) -> Result<(), MaintError> {
        match self.action {
            Some(current) if current != wanted => Err(MaintError::Ambiguous),
            _ => {
                self.action = Some(wanted);
                Ok(())
            },
        }
    }

    fn finish(mut self) -> Result<Self, MaintError> {
        match (self.format_layer, self.action) {
            (Some(_), Some(StartStopAction::Stop)) => {
                return Err(MaintError::IncompatibleOptions(
                    "Giving '--fl=<n>' and '--stop' (or '--eject') is invalid",
                ));
            },
            (Some(_), _) if self.power_condition != 0 => {
                return Err(MaintError::IncompatibleOptions(
                    "Giving '--fl=<n>' and '--pc=<n>' when <n> is non-zero is invalid",
                ));
            },
            (Some(_), _) | (None, Some(_)) => {},
            (None, None) if self.load_eject => {
                self.action = Some(StartStopAction::Stop);
            },
            (None, None) if self.power_condition == 0 => {
                self.action = Some(StartStopAction::Start);
            },
            (None, None) => {},
        }
        Ok(self)
    }

    /// Fields for the single START STOP UNIT command this intent maps to, or
    /// `None` when there is nothing to send.
    pub fn command_fields(&self) -> Option<StartStopUnitFields> {
        if let Some(layer) = self.format_layer {
            return Some(StartStopUnitFields {
                immediate: self.immediate,
                format_layer_number: (layer & 0x03) as u8,
                power_condition: 0,
                format_layer: true,
                load_eject: true,
                start: true,
            });
        }
        if self.power_condition > 0 {
            return Some(StartStopUnitFields {
                immediate: self.immediate,
                power_condition: self.power_condition,
                ..StartStopUnitFields::default()
            });
        }
        self.action.map(|action| StartStopUnitFields {
            immediate: self.immediate,
            load_eject: self.load_eject,
            start: action == StartStopAction::Start,
            ..StartStopUnitFields::default()
        })
    }
}
