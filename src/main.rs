fn main() -> bevy::app::AppExit {
    solar_system_notes_lib::run()
}
