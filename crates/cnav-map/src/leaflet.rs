//! Leaflet surface adapter
//!
//! Translates [`MapContent`] into what the Leaflet page inside the embedded
//! surface understands. The page keeps every element in one layer group that
//! is cleared on each `apply`, so a push always replaces the previous frame.
//! Values only ever reach the page as JSON, never spliced into code.

use serde::Serialize;

use crate::{MapContent, MapStyle};

/// Global the host exposes inside the surface for posting messages
pub const DEFAULT_BRIDGE_OBJECT: &str = "courtnavHost";

const DOCUMENT_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <style>
    html, body, #map { margin: 0; padding: 0; height: 100%; width: 100%; }
    .callout-title { font-weight: 600; }
    .callout-subtitle { color: #475569; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    (function () {
      var bridgeName = __BRIDGE_OBJECT__;
      var initial = __INITIAL_VIEW__;
      var map = L.map('map', { zoomControl: false }).setView([initial.lat, initial.lng], initial.zoom);
      L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
        maxZoom: 19,
        attribution: '&copy; OpenStreetMap contributors'
      }).addTo(map);
      var layer = L.layerGroup().addTo(map);

      function post(message) {
        var bridge = window[bridgeName];
        if (bridge && typeof bridge.postMessage === 'function') {
          bridge.postMessage(JSON.stringify(message));
        }
      }

      function calloutNode(callout) {
        var node = document.createElement('div');
        var title = document.createElement('div');
        title.className = 'callout-title';
        title.textContent = callout.title;
        var subtitle = document.createElement('div');
        subtitle.className = 'callout-subtitle';
        subtitle.textContent = callout.rating === null
          ? callout.subtitle
          : callout.subtitle + ' · ★ ' + callout.rating.toFixed(1);
        node.appendChild(title);
        node.appendChild(subtitle);
        return node;
      }

      function apply(content) {
        layer.clearLayers();

        var callouts = {};
        content.callouts.forEach(function (callout) { callouts[callout.markerId] = callout; });

        if (content.polyline) {
          var line = content.polyline;
          L.polyline(line.points.map(function (p) { return [p.lat, p.lng]; }), {
            color: line.color,
            weight: line.weight,
            opacity: 0.9,
            dashArray: line.dashed ? '8 8' : null
          }).addTo(layer);
        }

        content.markers.forEach(function (m) {
          var latlng = [m.position.lat, m.position.lng];
          if (m.halo) {
            L.circle(latlng, {
              radius: m.halo.radiusMeters,
              stroke: false,
              fillColor: m.halo.color,
              fillOpacity: m.halo.opacity
            }).addTo(layer);
          }
          var marker = L.circleMarker(latlng, {
            radius: m.kind === 'user' ? 7 : 10,
            color: '#ffffff',
            weight: 2,
            fillColor: m.color,
            fillOpacity: 1
          }).addTo(layer);
          if (callouts[m.id]) {
            marker.bindTooltip(calloutNode(callouts[m.id]), { direction: 'top', offset: [0, -8] });
          }
          if (m.onClick) {
            var payload = m.onClick;
            marker.on('click', function () { post(payload); });
          }
        });

        var camera = content.camera;
        if (camera.kind === 'fit') {
          map.fitBounds([
            [camera.bounds.southWest.lat, camera.bounds.southWest.lng],
            [camera.bounds.northEast.lat, camera.bounds.northEast.lng]
          ], {
            paddingTopLeft: [camera.padding.left, camera.padding.top],
            paddingBottomRight: [camera.padding.right, camera.padding.bottom],
            maxZoom: camera.maxZoom
          });
        } else {
          map.setView([camera.center.lat, camera.center.lng], camera.zoom);
        }
      }

      window.courtnav = { apply: apply };
    })();
  </script>
</body>
</html>
"#;

#[derive(Serialize)]
struct InitialView {
    lat: f64,
    lng: f64,
    zoom: u8,
}

/// Leaflet translation of map content
#[derive(Debug, Clone)]
pub struct LeafletAdapter {
    bridge_object: String,
}

impl Default for LeafletAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_BRIDGE_OBJECT)
    }
}

impl LeafletAdapter {
    pub fn new(bridge_object: &str) -> Self {
        Self {
            bridge_object: bridge_object.to_string(),
        }
    }

    pub fn bridge_object(&self) -> &str {
        &self.bridge_object
    }

    /// Initial HTML document hosting the map
    pub fn document(&self, style: &MapStyle) -> Result<String, serde_json::Error> {
        let initial = InitialView {
            lat: style.default_center.lat,
            lng: style.default_center.lng,
            zoom: style.default_zoom,
        };

        Ok(DOCUMENT_TEMPLATE
            .replace("__BRIDGE_OBJECT__", &script_json(&self.bridge_object)?)
            .replace("__INITIAL_VIEW__", &script_json(&initial)?))
    }

    /// Script replacing everything the page shows with `content`
    pub fn script(&self, content: &MapContent) -> Result<String, serde_json::Error> {
        Ok(format!(
            "window.courtnav && window.courtnav.apply({});true;",
            script_json(content)?
        ))
    }
}

/// JSON safe to embed in script text, including inside an HTML `<script>`
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}
