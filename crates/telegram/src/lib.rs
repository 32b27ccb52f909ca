//! Telegram side of the uploader bot.
//!
//! [`bot`] connects to the Bot API and turns long polling into a stream of
//! updates; [`Dispatcher`] consumes that stream one update at a time. All
//! outbound calls go through the [`Transport`] trait, implemented for the
//! Bot API by [`TelegramTransport`].

pub mod admin;
pub mod bot;
pub mod caption;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod gate;
pub mod intake;
pub mod outbound;
pub mod scheduler;
pub mod texts;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use {
    admin::AdminSessions,
    dispatcher::Dispatcher,
    error::{Error, Result},
    event::{Event, Upload},
    gate::MembershipGate,
    intake::ContentIntake,
    outbound::TelegramTransport,
    scheduler::DeletionScheduler,
    transport::{MemberStatus, Transport},
};
