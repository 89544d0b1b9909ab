#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::Delay;
use log::{error, info};

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    timer::timg::TimerGroup,
};

use treat_button::config;
use treat_button::infrastructure::adapters::TaskRequestWorker;
use treat_button::infrastructure::drivers::{EspWifiInterface, init_network_stack};
use treat_button::infrastructure::tasks::network_runner_task;
use treat_button::{button_gpio, led_gpio, mk_static};
use treat_button_core::{
    Blinker, ButtonPoller, RequestBridge, RequestSlot, TreatRequest, WifiConnector,
};

esp_bootloader_esp_idf::esp_app_desc!();

static REQUEST_SLOT: RequestSlot = RequestSlot::new();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Allocate heap memory for the radio (64 KB)
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let led = Output::new(led_gpio!(peripherals), Level::Low, OutputConfig::default());
    let button = Input::new(
        button_gpio!(peripherals),
        InputConfig::default().with_pull(Pull::Up),
    );
    let mut blinker = Blinker::new(led, Delay);

    let intent = config::connection_intent().expect("Invalid Wi-Fi configuration");
    let request = mk_static!(
        TreatRequest,
        config::treat_request().expect("Invalid treat configuration")
    );

    // Initialize network stack and join the network
    let (stack, runner, controller) = init_network_stack(peripherals.WIFI);
    spawner.spawn(network_runner_task(runner)).ok();

    let connector = WifiConnector::new(EspWifiInterface::new(controller, stack), intent)
        .with_policy(config::connect_policy());
    // Keeps the radio controller alive for the lifetime of the program
    let _wifi = match connector.init_client(&mut blinker).await {
        Ok(wifi) => wifi,
        Err(e) => {
            error!("network: {e}, restarting");
            esp_hal::system::software_reset()
        }
    };

    info!("treat: posting to {}", request.url());
    let worker = TaskRequestWorker::new(spawner, stack, request);
    let bridge = RequestBridge::new(&REQUEST_SLOT, worker);
    let mut poller = ButtonPoller::new(button, bridge, blinker);

    match poller.run().await {}
}
