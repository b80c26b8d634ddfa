// SPDX-License-Identifier: CEPL-1.0
use std::collections::BTreeSet;

use ash::vk;

/// Queue family indices a device needs; either may still be unknown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    /// Single left-to-right scan recording the first graphics-capable family
    /// and the first family that can present to the surface. Stops as soon
    /// as both are known.
    pub fn locate(
        families: &[vk::QueueFamilyProperties],
        mut supports_present: impl FnMut(u32) -> bool,
    ) -> Self {
        let mut indices = Self::default();
        for (i, family) in families.iter().enumerate() {
            let i = i as u32;
            if indices.graphics.is_none() && family.queue_flags.contains(vk::QueueFlags::GRAPHICS)
            {
                indices.graphics = Some(i);
            }
            if indices.present.is_none() && supports_present(i) {
                indices.present = Some(i);
            }
            if indices.is_complete() {
                break;
            }
        }
        indices
    }

    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }

    pub fn complete(&self) -> Option<ResolvedQueues> {
        Some(ResolvedQueues {
            graphics: self.graphics?,
            present: self.present?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedQueues {
    pub graphics: u32,
    pub present: u32,
}

impl ResolvedQueues {
    /// One entry per distinct family, ascending.
    pub fn unique(&self) -> Vec<u32> {
        [self.graphics, self.present]
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Swapchain images are shared concurrently when the two roles live in
    /// different families.
    pub fn sharing(&self) -> (vk::SharingMode, Vec<u32>) {
        if self.graphics != self.present {
            (
                vk::SharingMode::CONCURRENT,
                vec![self.graphics, self.present],
            )
        } else {
            (vk::SharingMode::EXCLUSIVE, Vec::new())
        }
    }
}
