//! # MQTT Dispatch Sink
//!
//! Publishes changed values to an MQTT broker with `rumqttc`, following the Homie
//! convention. The broker connection is driven by a background task that keeps
//! reconnecting. Publications go to a bounded request queue without waiting: when the
//! queue is full they fail with `BrokerError` instead of blocking frame processing.

use crate::config::BrokerConfig;
use crate::constants::{MQTT_CLOSE_TIMEOUT, MQTT_RECONNECT_DELAY, MQTT_REQUEST_CAPACITY};
use crate::error::TicError;
use crate::homie::{HomieDevice, HomieMessage};
use crate::sink::DispatchSink;
use crate::tic::fields::FieldDescriptor;
use log::{debug, error, info, warn};
use rumqttc::{AsyncClient, Event, EventLoop, LastWill, MqttOptions, Outgoing, Packet, QoS};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Maps a numeric QoS level; anything above 2 is rejected.
pub fn qos_from_level(level: u8) -> Result<QoS, TicError> {
    match level {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        other => Err(TicError::ConfigError(format!("Invalid QoS level {other}"))),
    }
}

/// Builds the client options, last will included.
pub fn mqtt_options(config: &BrokerConfig, homie: &HomieDevice) -> MqttOptions {
    let mut options = MqttOptions::new(config.client_id.clone(), config.host.clone(), config.port);
    options.set_keep_alive(Duration::from_secs(config.keepalive.max(1)));

    let will = homie.last_will();
    options.set_last_will(LastWill::new(will.topic, will.payload, QoS::ExactlyOnce, true));
    options
}

pub struct MqttSink {
    client: AsyncClient,
    homie: HomieDevice,
    qos: QoS,
    event_task: Option<JoinHandle<()>>,
}

impl MqttSink {
    /// Starts the connection and announces the device and its properties.
    pub async fn connect<'a, I>(
        config: &BrokerConfig,
        homie: HomieDevice,
        fields: I,
    ) -> Result<MqttSink, TicError>
    where
        I: IntoIterator<Item = &'a FieldDescriptor>,
    {
        let qos = qos_from_level(config.qos)?;
        let (client, eventloop) =
            AsyncClient::new(mqtt_options(config, &homie), MQTT_REQUEST_CAPACITY);
        let event_task = tokio::spawn(drive_event_loop(eventloop));
        info!("Connecting to MQTT broker {}:{}", config.host, config.port);

        let sink = MqttSink {
            client,
            homie,
            qos,
            event_task: Some(event_task),
        };
        for message in sink.homie.advertisement(fields) {
            sink.send(message)?;
        }
        Ok(sink)
    }

    pub fn homie(&self) -> &HomieDevice {
        &self.homie
    }

    fn send(&self, message: HomieMessage) -> Result<(), TicError> {
        self.client
            .try_publish(message.topic, self.qos, true, message.payload)
            .map_err(TicError::from)
    }
}

#[async_trait::async_trait]
impl DispatchSink for MqttSink {
    async fn publish(&mut self, field: &FieldDescriptor, value: &str) -> Result<(), TicError> {
        let topic = self.homie.property_topic(field);
        self.client
            .try_publish(topic.as_str(), self.qos, true, value.as_bytes().to_vec())
            .map_err(|e| TicError::BrokerError(format!("Cannot publish topic {topic}: {e}")))
    }

    async fn close(&mut self) -> Result<(), TicError> {
        let state = self.send(self.homie.disconnected());
        let disconnect = self.client.try_disconnect().map_err(TicError::from);

        if let Some(mut task) = self.event_task.take() {
            // Give the event loop a moment to flush the state and the disconnect
            if tokio::time::timeout(MQTT_CLOSE_TIMEOUT, &mut task).await.is_err() {
                warn!("MQTT event loop did not stop in time");
                task.abort();
            }
        }
        state.and(disconnect)
    }
}

impl Drop for MqttSink {
    fn drop(&mut self) {
        if let Some(task) = self.event_task.take() {
            task.abort();
        }
    }
}

/// Polls the connection until a disconnect has been sent. Errors are logged and the
/// connection retried after a pause.
async fn drive_event_loop(mut eventloop: EventLoop) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!("Connected to MQTT broker ({:?})", ack.code);
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                debug!("MQTT disconnect sent");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT connection error: {e}");
                tokio::time::sleep(MQTT_RECONNECT_DELAY).await;
            }
        }
    }
}
