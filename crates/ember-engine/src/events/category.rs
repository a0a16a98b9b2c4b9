use std::fmt;

bitflags::bitflags! {
    /// Category bitmask attached to every event.
    ///
    /// An event may belong to several categories at once (a mouse button press
    /// is `INPUT | MOUSE | MOUSE_BUTTON`). Membership is a bitwise AND test.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct EventCategory: u8 {
        const APPLICATION = 1 << 0;
        const INPUT = 1 << 1;
        const KEYBOARD = 1 << 2;
        const MOUSE = 1 << 3;
        const MOUSE_BUTTON = 1 << 4;
        const CUSTOM = 1 << 5;
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(EventCategory, &str); 6] = [
            (EventCategory::APPLICATION, "Application"),
            (EventCategory::INPUT, "Input"),
            (EventCategory::KEYBOARD, "Keyboard"),
            (EventCategory::MOUSE, "Mouse"),
            (EventCategory::MOUSE_BUTTON, "MouseButton"),
            (EventCategory::CUSTOM, "Custom"),
        ];

        if self.is_empty() {
            return f.write_str("None");
        }

        let mut first = true;
        for (bit, name) in NAMES {
            if self.contains(bit) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
