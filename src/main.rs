fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the map viewer application
    map_viewer::run_app()
}
