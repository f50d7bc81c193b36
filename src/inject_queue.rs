use alloc::{boxed::Box, vec::Vec};
use core::mem;
use parking_lot::Mutex;

use crate::{
    any::TypeInfo,
    container::Container,
    descriptor::Injectable,
    errors::ResolveErrorKind,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

pub(crate) trait InjectFn: Fn(&Container) -> Result<(), ResolveErrorKind> + SendSafety + SyncSafety {}

impl<F> InjectFn for F where F: Fn(&Container) -> Result<(), ResolveErrorKind> + SendSafety + SyncSafety {}

pub(crate) struct Pending {
    address: usize,
    pub(crate) inject: Box<dyn InjectFn>,
}

/// Objects waiting for field injection, in the order they were queued
#[derive(Default)]
pub(crate) struct InjectQueue {
    pending: Vec<Pending>,
}

impl InjectQueue {
    /// Queues the target, returns `false` if the same target is already queued
    pub(crate) fn push<T: Injectable>(&mut self, target: &RcThreadSafety<Mutex<T>>) -> bool {
        let address = RcThreadSafety::as_ptr(target) as usize;
        if self.pending.iter().any(|pending| pending.address == address) {
            return false;
        }

        let target = target.clone();
        self.pending.push(Pending {
            address,
            inject: Box::new(move |container: &Container| {
                let mut target = target.try_lock().ok_or(ResolveErrorKind::Locked {
                    object: TypeInfo::of::<T>(),
                })?;
                container.inject_fields(&mut *target)
            }),
        });
        true
    }

    #[inline]
    pub(crate) fn take(&mut self) -> Vec<Pending> {
        mem::take(&mut self.pending)
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
