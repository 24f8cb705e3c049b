//! Key and mouse button identifiers tracked by the sandbox

macro_rules! key_codes {
    ($($(#[$doc:meta])* $name:ident),+ $(,)?) => {
        /// Keyboard keys tracked by the input system
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum KeyCode {
            $($(#[$doc])* $name,)+
        }

        impl KeyCode {
            /// Every tracked key, in index order
            pub const ALL: &'static [KeyCode] = &[$(KeyCode::$name,)+];

            /// Number of tracked keys
            pub const COUNT: usize = Self::ALL.len();

            /// Dense index used for per-key state tables
            pub const fn index(self) -> usize {
                self as usize
            }
        }
    };
}

key_codes! {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Digit 0
    Num0,
    /// Digit 1
    Num1,
    /// Digit 2
    Num2,
    /// Digit 3
    Num3,
    /// Digit 4
    Num4,
    /// Digit 5
    Num5,
    /// Digit 6
    Num6,
    /// Digit 7
    Num7,
    /// Digit 8
    Num8,
    /// Digit 9
    Num9,
    /// Space bar
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Left shift
    LeftShift,
    /// Right shift
    RightShift,
    /// Left control
    LeftControl,
    /// Right control
    RightControl,
    /// Home key
    Home,
    /// End key
    End,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

impl MouseButton {
    /// Every tracked button, in index order
    pub const ALL: &'static [MouseButton] = &[Self::Left, Self::Right, Self::Middle];

    /// Number of tracked buttons
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index used for per-button state tables
    pub const fn index(self) -> usize {
        self as usize
    }
}
