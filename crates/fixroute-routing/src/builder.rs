use std::sync::Arc;

use fixroute_core::{ChannelRecord, NodeId, Route, RouteConfig, RouteHop};

use crate::error::RoutingError;
use crate::gossip::GossipCache;
use crate::onion::OnionStyleSelector;
use crate::traits::{PathFindingOracle, PathRequest};

/// Direction bit of the `channel_update` a payment from `source` to
/// `destination` travels under.
///
/// BOLT 7 assigns direction 0 to updates originating at `node_id_1`, the
/// lesser of the two keys, so the bit is 1 exactly when `destination` is
/// the lesser key.
pub fn channel_direction(source: &NodeId, destination: &NodeId) -> u8 {
    u8::from(destination < source)
}

/// Builds source routes that pass through a fixed list of waypoints.
///
/// Consecutive waypoints joined by a cached channel become a single hop.
/// Any other pair is handed to the [`PathFindingOracle`] and its hops are
/// spliced in.
pub struct RouteBuilder {
    cache: Arc<GossipCache>,
    oracle: Arc<dyn PathFindingOracle>,
    config: RouteConfig,
}

/// What the hop entering a leg's source has to cover.
struct LegCost<'a> {
    /// Amount the source forwards on this leg.
    forwarded_msat: u64,
    /// CLTV delta the source hands out on this leg.
    delay: u32,
    /// Channel the source forwards over.
    channel: &'a ChannelRecord,
}

impl RouteBuilder {
    pub fn new(
        cache: Arc<GossipCache>,
        oracle: Arc<dyn PathFindingOracle>,
        config: RouteConfig,
    ) -> Self {
        Self {
            cache,
            oracle,
            config,
        }
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Build a route delivering `amount_msat` to the last waypoint, passing
    /// through every waypoint in order.
    ///
    /// Legs are resolved from the destination backward so that each hop's
    /// amount and delay already include everything charged downstream of it.
    /// Any failure aborts the build; no partial route is returned.
    pub async fn build(
        &self,
        amount_msat: u64,
        waypoints: &[NodeId],
    ) -> Result<Route, RoutingError> {
        validate_waypoints(waypoints)?;
        if amount_msat == 0 {
            return Err(RoutingError::InvalidAmount);
        }

        let snapshot = self.cache.snapshot();
        let selector = OnionStyleSelector::new(&snapshot);

        let mut amount = amount_msat;
        let mut delay = self.config.min_final_cltv;
        let mut fees: u64 = 0;
        let mut hops: Vec<RouteHop> = Vec::with_capacity(waypoints.len());

        for pair in waypoints.windows(2).rev() {
            let (src, dest) = (&pair[0], &pair[1]);
            amount = amount
                .checked_add(fees)
                .ok_or(RoutingError::Overflow("amount"))?;

            let leg = match snapshot.channel(src, dest) {
                Some(channel) => {
                    let style = selector.select(dest)?;
                    hops.push(RouteHop {
                        id: *dest,
                        channel: channel.short_channel_id,
                        direction: channel_direction(src, dest),
                        amount_msat: amount,
                        delay,
                        style,
                    });
                    LegCost {
                        forwarded_msat: amount,
                        delay,
                        channel,
                    }
                }
                None => {
                    let path = self.fill_gap(src, dest, amount, delay).await?;
                    let first = path[0].clone();
                    let channel = snapshot.channel(src, &first.id).ok_or(
                        RoutingError::MissingChannel {
                            from: *src,
                            to: first.id,
                        },
                    )?;
                    hops.extend(path.into_iter().rev());
                    LegCost {
                        forwarded_msat: first.amount_msat,
                        delay: first.delay,
                        channel,
                    }
                }
            };

            amount = leg.forwarded_msat;
            fees = leg
                .channel
                .fee_for(leg.forwarded_msat)
                .ok_or(RoutingError::Overflow("fee"))?;
            delay = leg
                .delay
                .checked_add(leg.channel.cltv_delta)
                .ok_or(RoutingError::Overflow("delay"))?;
        }

        hops.reverse();
        let route = Route::new(hops);
        tracing::info!(
            waypoints = waypoints.len(),
            hops = route.hop_count(),
            sent_msat = route.sent_msat(),
            fees_msat = route.total_fees_msat(),
            total_delay = route.total_delay(),
            "built fixed route"
        );
        Ok(route)
    }

    /// Ask the oracle for a path `src -> dest` and check it is usable.
    async fn fill_gap(
        &self,
        src: &NodeId,
        dest: &NodeId,
        amount_msat: u64,
        final_cltv: u32,
    ) -> Result<Vec<RouteHop>, RoutingError> {
        let request = PathRequest {
            destination: *dest,
            amount_msat,
            risk_factor: self.config.risk_factor,
            final_cltv,
            from: *src,
        };
        tracing::debug!(
            from = %src,
            to = %dest,
            amount_msat,
            final_cltv,
            "no cached channel, querying path finder"
        );

        let path = self
            .oracle
            .find_path(&request)
            .await
            .map_err(|source| RoutingError::Oracle {
                from: *src,
                to: *dest,
                source,
            })?;

        let no_path = |reason: &str| RoutingError::NoPath {
            from: *src,
            to: *dest,
            reason: reason.to_string(),
        };
        match path.last() {
            None => return Err(no_path("path finder returned an empty route")),
            Some(last) if last.id != *dest => {
                return Err(no_path("path finder route does not end at the waypoint"))
            }
            Some(last) if last.amount_msat < amount_msat => {
                return Err(no_path("path finder route delivers less than requested"))
            }
            Some(last) if last.delay < final_cltv => {
                return Err(no_path("path finder route ends below the requested cltv"))
            }
            Some(_) => {}
        }
        // Each hop must carry at least what the next one forwards.
        if path
            .windows(2)
            .any(|w| w[0].amount_msat < w[1].amount_msat || w[0].delay < w[1].delay)
        {
            return Err(no_path("path finder route amounts or delays increase downstream"));
        }

        tracing::debug!(from = %src, to = %dest, hops = path.len(), "path finder filled gap");
        Ok(path)
    }
}

fn validate_waypoints(waypoints: &[NodeId]) -> Result<(), RoutingError> {
    if waypoints.len() < 2 {
        return Err(RoutingError::InvalidWaypoints(format!(
            "need at least 2 waypoints, got {}",
            waypoints.len()
        )));
    }
    if let Some(pair) = waypoints.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(RoutingError::InvalidWaypoints(format!(
            "consecutive waypoints must differ, {} repeats",
            pair[0]
        )));
    }
    Ok(())
}
