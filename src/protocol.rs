//! Protocol Bindings (spec.md §2.4, §4.1): static, by-name-and-opcode
//! descriptions of every interface the client actually speaks.
//!
//! Each interface is described only as far as this client needs it: its
//! name (for registry binding and diagnostics), the argument schema of the
//! requests it sends, and the schema of the events it can receive. This is
//! the client-side analogue of a generated `*.xml` protocol scanner output,
//! written by hand for the small interface surface in scope.

use crate::wire::ArgKind;

/// A request or event's argument schema, by opcode.
pub type Schema = &'static [&'static [ArgKind]];

/// Static description of one Wayland interface.
pub struct Interface {
    pub name: &'static str,
    pub max_version: u32,
    pub requests: Schema,
    pub events: Schema,
}

impl Interface {
    pub fn request_args(&self, opcode: u16) -> Option<&'static [ArgKind]> {
        self.requests.get(opcode as usize).copied()
    }

    pub fn event_args(&self, opcode: u16) -> Option<&'static [ArgKind]> {
        self.events.get(opcode as usize).copied()
    }
}

use ArgKind::*;

// --- wl_display --------------------------------------------------------

pub mod wl_display {
    use super::*;

    pub mod request {
        pub const SYNC: u16 = 0;
        pub const GET_REGISTRY: u16 = 1;
    }
    pub mod event {
        pub const ERROR: u16 = 0;
        pub const DELETE_ID: u16 = 1;
    }

    pub static REQUESTS: Schema = &[&[NewId], &[NewId]];
    pub static EVENTS: Schema = &[&[Object, Uint, String], &[Uint]];

    pub static INTERFACE: Interface = Interface {
        name: "wl_display",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- wl_registry --------------------------------------------------------

pub mod wl_registry {
    use super::*;

    pub mod request {
        pub const BIND: u16 = 0;
    }
    pub mod event {
        pub const GLOBAL: u16 = 0;
        pub const GLOBAL_REMOVE: u16 = 1;
    }

    pub static REQUESTS: Schema = &[&[Uint, String, Uint, NewId]];
    pub static EVENTS: Schema = &[&[Uint, String, Uint], &[Uint]];

    pub static INTERFACE: Interface = Interface {
        name: "wl_registry",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- wl_callback --------------------------------------------------------

pub mod wl_callback {
    use super::*;

    pub mod event {
        pub const DONE: u16 = 0;
    }

    pub static REQUESTS: Schema = &[];
    pub static EVENTS: Schema = &[&[Uint]];

    pub static INTERFACE: Interface = Interface {
        name: "wl_callback",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- wl_compositor -------------------------------------------------------

pub mod wl_compositor {
    use super::*;

    pub mod request {
        pub const CREATE_SURFACE: u16 = 0;
    }

    pub static REQUESTS: Schema = &[&[NewId]];
    pub static EVENTS: Schema = &[];

    pub static INTERFACE: Interface = Interface {
        name: "wl_compositor",
        max_version: 5,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- wl_shm / wl_shm_pool / wl_buffer ------------------------------------

pub mod wl_shm {
    use super::*;

    pub mod request {
        pub const CREATE_POOL: u16 = 0;
    }
    pub mod event {
        pub const FORMAT: u16 = 0;
    }

    pub const FORMAT_ARGB8888: u32 = 0;

    pub static REQUESTS: Schema = &[&[NewId, Fd, Int]];
    pub static EVENTS: Schema = &[&[Uint]];

    pub static INTERFACE: Interface = Interface {
        name: "wl_shm",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

pub mod wl_shm_pool {
    use super::*;

    pub mod request {
        pub const CREATE_BUFFER: u16 = 0;
        pub const DESTROY: u16 = 1;
        pub const RESIZE: u16 = 2;
    }

    pub static REQUESTS: Schema = &[
        &[NewId, Int, Int, Int, Int, Uint],
        &[],
        &[Int],
    ];
    pub static EVENTS: Schema = &[];

    pub static INTERFACE: Interface = Interface {
        name: "wl_shm_pool",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

pub mod wl_buffer {
    use super::*;

    pub mod request {
        pub const DESTROY: u16 = 0;
    }
    pub mod event {
        pub const RELEASE: u16 = 0;
    }

    pub static REQUESTS: Schema = &[&[]];
    pub static EVENTS: Schema = &[&[]];

    pub static INTERFACE: Interface = Interface {
        name: "wl_buffer",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- wl_surface -----------------------------------------------------------

pub mod wl_surface {
    use super::*;

    pub mod request {
        pub const ATTACH: u16 = 1;
        pub const DAMAGE: u16 = 2;
        pub const COMMIT: u16 = 6;
    }

    pub static REQUESTS: Schema = &[
        &[],
        &[Object, Int, Int],
        &[Int, Int, Int, Int],
        &[],
        &[],
        &[],
        &[],
    ];
    pub static EVENTS: Schema = &[];

    pub static INTERFACE: Interface = Interface {
        name: "wl_surface",
        max_version: 6,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- wl_output --------------------------------------------------------

pub mod wl_output {
    use super::*;

    pub mod event {
        pub const GEOMETRY: u16 = 0;
        pub const MODE: u16 = 1;
        pub const SCALE: u16 = 3;
        pub const NAME: u16 = 4;
        pub const DONE: u16 = 2;
    }

    pub static REQUESTS: Schema = &[];
    pub static EVENTS: Schema = &[
        &[Int, Int, Int, Int, Int, String, String, Int],
        &[Uint, Int, Int, Int],
        &[],
        &[Int],
        &[String],
    ];

    pub static INTERFACE: Interface = Interface {
        name: "wl_output",
        max_version: 4,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- wl_seat / wl_keyboard / wl_pointer ---------------------------------

pub mod wl_seat {
    use super::*;

    pub mod request {
        pub const GET_POINTER: u16 = 0;
        pub const GET_KEYBOARD: u16 = 1;
    }
    pub mod event {
        pub const CAPABILITIES: u16 = 0;
        pub const NAME: u16 = 1;
    }

    pub const CAPABILITY_POINTER: u32 = 1;
    pub const CAPABILITY_KEYBOARD: u32 = 2;

    pub static REQUESTS: Schema = &[&[NewId], &[NewId]];
    pub static EVENTS: Schema = &[&[Uint], &[String]];

    pub static INTERFACE: Interface = Interface {
        name: "wl_seat",
        max_version: 8,
        requests: REQUESTS,
        events: EVENTS,
    };
}

pub mod wl_keyboard {
    use super::*;

    pub mod event {
        pub const KEYMAP: u16 = 0;
        pub const ENTER: u16 = 1;
        pub const LEAVE: u16 = 2;
        pub const KEY: u16 = 3;
        pub const MODIFIERS: u16 = 4;
    }

    pub const KEY_STATE_RELEASED: u32 = 0;
    pub const KEY_STATE_PRESSED: u32 = 1;

    pub static REQUESTS: Schema = &[];
    pub static EVENTS: Schema = &[
        &[Uint, Fd, Uint],
        &[Uint, Object, Array],
        &[Uint, Object],
        &[Uint, Uint, Uint, Uint],
        &[Uint, Uint, Uint, Uint, Uint],
    ];

    pub static INTERFACE: Interface = Interface {
        name: "wl_keyboard",
        max_version: 8,
        requests: REQUESTS,
        events: EVENTS,
    };
}

pub mod wl_pointer {
    use super::*;

    pub mod event {
        pub const ENTER: u16 = 0;
        pub const LEAVE: u16 = 1;
        pub const MOTION: u16 = 2;
        pub const BUTTON: u16 = 3;
    }

    pub const BUTTON_STATE_RELEASED: u32 = 0;
    pub const BUTTON_STATE_PRESSED: u32 = 1;

    pub static REQUESTS: Schema = &[];
    pub static EVENTS: Schema = &[
        &[Uint, Object, Fixed, Fixed],
        &[Uint, Object],
        &[Uint, Fixed, Fixed],
        &[Uint, Uint, Uint, Uint],
    ];

    pub static INTERFACE: Interface = Interface {
        name: "wl_pointer",
        max_version: 8,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- zriver_window_management_v1 ----------------------------------------
//
// The global itself only announces new windows; geometry/fullscreen/close
// requests and the mapped/title/app_id/urgent events live on the
// per-window object it hands out (`river_window`, below).

pub mod river_window_management {
    use super::*;

    pub mod event {
        pub const WINDOW_CREATED: u16 = 0;
    }

    pub static REQUESTS: Schema = &[];
    pub static EVENTS: Schema = &[&[NewId]];

    pub static INTERFACE: Interface = Interface {
        name: "zriver_window_management_v1",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- zriver_window_v1 (per-window object) --------------------------------

pub mod river_window {
    use super::*;

    pub mod request {
        pub const SET_GEOMETRY: u16 = 0;
        pub const SET_FULLSCREEN: u16 = 1;
        pub const CLOSE: u16 = 2;
    }
    pub mod event {
        pub const MAPPED: u16 = 0;
        pub const UNMAPPED: u16 = 1;
        pub const CLOSED: u16 = 2;
        pub const TITLE: u16 = 3;
        pub const APP_ID: u16 = 4;
        pub const URGENT: u16 = 5;
    }

    pub static REQUESTS: Schema = &[
        &[Int, Int, Int, Int, Uint],
        &[Uint],
        &[],
    ];
    pub static EVENTS: Schema = &[
        &[],
        &[],
        &[],
        &[String],
        &[String],
        &[Uint],
    ];

    pub static INTERFACE: Interface = Interface {
        name: "zriver_window_v1",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- zriver_xkb_bindings_v1 ----------------------------------------------

pub mod river_xkb_bindings {
    use super::*;

    pub mod request {
        pub const ADD_BINDING: u16 = 0;
        pub const CLEAR_BINDINGS: u16 = 1;
    }
    pub mod event {
        pub const PRESSED: u16 = 0;
    }

    pub static REQUESTS: Schema = &[&[Uint, Uint, Uint], &[]];
    pub static EVENTS: Schema = &[&[Uint, Uint]];

    pub static INTERFACE: Interface = Interface {
        name: "zriver_xkb_bindings_v1",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

// --- zriver_layer_shell_v1 / layer_surface --------------------------------

pub mod river_layer_shell {
    use super::*;

    pub mod request {
        pub const GET_LAYER_SURFACE: u16 = 0;
    }

    // Layer enum, in stacking order bottom to top.
    pub const LAYER_BACKGROUND: u32 = 0;
    pub const LAYER_BOTTOM: u32 = 1;
    pub const LAYER_TOP: u32 = 2;
    pub const LAYER_OVERLAY: u32 = 3;

    pub static REQUESTS: Schema = &[&[NewId, Object, Object, Uint, String]];
    pub static EVENTS: Schema = &[];

    pub static INTERFACE: Interface = Interface {
        name: "zriver_layer_shell_v1",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

pub mod river_layer_surface {
    use super::*;

    pub mod request {
        pub const SET_SIZE: u16 = 0;
        pub const SET_ANCHOR: u16 = 1;
        pub const SET_EXCLUSIVE_ZONE: u16 = 2;
        pub const ACK_CONFIGURE: u16 = 3;
        pub const DESTROY: u16 = 4;
    }
    pub mod event {
        pub const CONFIGURE: u16 = 0;
        pub const CLOSED: u16 = 1;
    }

    // Anchor bitflags.
    pub const ANCHOR_TOP: u32 = 1;
    pub const ANCHOR_BOTTOM: u32 = 2;
    pub const ANCHOR_LEFT: u32 = 4;
    pub const ANCHOR_RIGHT: u32 = 8;

    pub static REQUESTS: Schema = &[
        &[Uint, Uint],
        &[Uint],
        &[Int],
        &[Uint],
        &[],
    ];
    pub static EVENTS: Schema = &[&[Uint, Uint, Uint], &[]];

    pub static INTERFACE: Interface = Interface {
        name: "zriver_layer_surface_v1",
        max_version: 1,
        requests: REQUESTS,
        events: EVENTS,
    };
}

/// The globals the manager must bind during registry bootstrap (spec.md
/// §4.3). Order is not significant; all are required.
pub const REQUIRED_GLOBALS: &[&str] = &[
    wl_compositor::INTERFACE.name,
    wl_shm::INTERFACE.name,
    wl_seat::INTERFACE.name,
    river_window_management::INTERFACE.name,
    river_xkb_bindings::INTERFACE.name,
    river_layer_shell::INTERFACE.name,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_globals_have_schemas() {
        for name in REQUIRED_GLOBALS {
            assert!(!name.is_empty());
        }
    }

    #[test]
    fn wl_surface_attach_schema_matches_scenario_a() {
        let args = wl_surface::INTERFACE.request_args(wl_surface::request::ATTACH).unwrap();
        assert_eq!(args, &[Object, Int, Int]);
    }
}
