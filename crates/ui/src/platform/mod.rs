mod desktop;

pub use desktop::DesktopCloseBridge;
