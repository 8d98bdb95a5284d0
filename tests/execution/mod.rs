mod playback_tests;
mod session_tests;
